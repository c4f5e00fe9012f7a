//! reqwest-backed [`NewsApi`] implementation.
//!
//! [`HttpGateway`] issues one HTTP request per trait call against the
//! configured base URL and maps every failure onto [`PulseError`]:
//!
//! | Failure | Error |
//! |---------|-------|
//! | connect / DNS / timeout / body read | [`PulseError::Network`] |
//! | non-2xx status | [`PulseError::Http`] with the body's `detail` (or `detail.message`), else a per-endpoint label |
//! | 2xx with a body that does not decode | [`PulseError::Decode`] |
//!
//! No retries are attempted; the session decides what to retry.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use news_pulse_core::api::NewsApi;
use news_pulse_core::models::{
    BreakingStory, EntityReport, RelatedArticle, SearchPage, SummaryInput, TopicReport, Trend,
};
use news_pulse_core::PulseError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;

const SEARCH_FAILED: &str = "Search failed";
const SUMMARIZE_FAILED: &str = "Summarization failed";
const RELATED_FAILED: &str = "Failed to fetch related articles";
const BREAKING_FAILED: &str = "Failed to fetch breaking news";
const TRENDS_FAILED: &str = "Failed to fetch trends";
const ENTITIES_FAILED: &str = "Failed to fetch entities";
const TOPICS_FAILED: &str = "Failed to fetch topics";

#[derive(Deserialize)]
struct SummaryBody {
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct RelatedBody {
    #[serde(default)]
    related: Vec<RelatedArticle>,
}

#[derive(Deserialize)]
struct BreakingBody {
    #[serde(default)]
    breaking: Vec<BreakingStory>,
}

#[derive(Deserialize)]
struct TrendsBody {
    #[serde(default)]
    trending: Vec<Trend>,
}

/// HTTP client for the News Pulse backend.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<T, PulseError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = detail_message(&body).unwrap_or_else(|| fallback.to_string());
            return Err(PulseError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| PulseError::Decode(e.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> PulseError {
    if err.is_decode() {
        PulseError::Decode(err.to_string())
    } else {
        PulseError::Network(err.to_string())
    }
}

/// Extract the server's error text from a FastAPI-style error body.
///
/// Accepts `{"detail": "text"}` and `{"detail": {"message": "text"}}`.
pub fn detail_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = json.get("detail")?;
    let text = match detail {
        serde_json::Value::String(s) => s.as_str(),
        other => other.get("message")?.as_str()?,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl NewsApi for HttpGateway {
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, PulseError> {
        let request = self.client.get(self.url("/search")).query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ]);
        self.send(request, SEARCH_FAILED).await
    }

    async fn summarize(&self, input: &SummaryInput) -> Result<String, PulseError> {
        let request = self.client.post(self.url("/summarize")).json(input);
        let body: SummaryBody = self.send(request, SUMMARIZE_FAILED).await?;
        Ok(body.summary)
    }

    async fn related_by_url(
        &self,
        url: &str,
        title: &str,
        top_k: u32,
    ) -> Result<Vec<RelatedArticle>, PulseError> {
        let request = self.client.get(self.url("/related-by-url")).query(&[
            ("url", url.to_string()),
            ("title", title.to_string()),
            ("top_k", top_k.to_string()),
        ]);
        let body: RelatedBody = self.send(request, RELATED_FAILED).await?;
        Ok(body.related)
    }

    async fn related_by_index(
        &self,
        index: usize,
        top_k: u32,
    ) -> Result<Vec<RelatedArticle>, PulseError> {
        let request = self
            .client
            .get(self.url(&format!("/related/{}", index)))
            .query(&[("top_k", top_k)]);
        let body: RelatedBody = self.send(request, RELATED_FAILED).await?;
        Ok(body.related)
    }

    async fn breaking(&self, threshold: u32) -> Result<Vec<BreakingStory>, PulseError> {
        let request = self
            .client
            .get(self.url("/breaking"))
            .query(&[("threshold", threshold)]);
        let body: BreakingBody = self.send(request, BREAKING_FAILED).await?;
        Ok(body.breaking)
    }

    async fn trends(&self) -> Result<Vec<Trend>, PulseError> {
        let request = self.client.get(self.url("/trends"));
        let body: TrendsBody = self.send(request, TRENDS_FAILED).await?;
        Ok(body.trending)
    }

    async fn entities(&self) -> Result<EntityReport, PulseError> {
        let request = self.client.get(self.url("/entities"));
        self.send(request, ENTITIES_FAILED).await
    }

    async fn topics(
        &self,
        lookback_hours: u32,
        min_articles: u32,
    ) -> Result<TopicReport, PulseError> {
        let request = self.client.get(self.url("/topics")).query(&[
            ("lookback_hours", lookback_hours),
            ("min_articles", min_articles),
        ]);
        self.send(request, TOPICS_FAILED).await
    }
}
