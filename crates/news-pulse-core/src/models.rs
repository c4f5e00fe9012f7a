//! Wire-level data types for the News Pulse API.
//!
//! These mirror the JSON bodies returned by the backend. Optional or
//! nullable fields default rather than fail, since the upstream news feed
//! is loose about which fields are present.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PulseError;

/// Identifier of a result item within its result set: the article URL,
/// suffixed with `#n` for the n-th copy of a URL repeated in the same set.
pub type ItemKey = String;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Sentiment classes produced by the backend classifier.
///
/// Parsing is case-insensitive; anything unrecognised (including the
/// backend's own `"unknown"`) maps to [`SentimentLabel::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    #[default]
    Unknown,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Unknown => "unknown",
        }
    }
}

impl From<&str> for SentimentLabel {
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            "neutral" => SentimentLabel::Neutral,
            _ => SentimentLabel::Unknown,
        }
    }
}

impl From<String> for SentimentLabel {
    fn from(label: String) -> Self {
        SentimentLabel::from(label.as_str())
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.as_str().to_string()
    }
}

/// Sentiment attached to an article by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: SentimentLabel,
    /// Classifier confidence in `[0, 1]`, absent when classification failed.
    #[serde(default)]
    pub score: Option<f64>,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl Article {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// Metadata accompanying a page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMeta {
    #[serde(rename = "totalResults", default, deserialize_with = "null_as_default")]
    pub total_results: u64,
    /// The query as echoed back by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub q: String,
}

/// Body of `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: SearchMeta,
}

/// Body of `POST /summarize`. Empty fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SummaryInput {
    /// Request for free text pasted by the user, sent as `content` only.
    ///
    /// # Errors
    ///
    /// [`PulseError::EmptyInput`] if `text` is blank.
    pub fn from_text(text: &str) -> Result<Self, PulseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PulseError::EmptyInput);
        }
        Ok(Self {
            content: Some(text.to_string()),
            ..Self::default()
        })
    }
}

impl From<&Article> for SummaryInput {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
        }
    }
}

/// A semantically similar article returned by the related endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedArticle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Cosine similarity in `[0, 1]`.
    #[serde(default)]
    pub similarity: f64,
}

/// A story flagged by the breaking-news detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakingStory {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Urgency score in `[0, 100]`.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub article_count: u32,
    /// ISO 8601 timestamp of detection, emitted in UTC with an offset.
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub novel_entities: Vec<String>,
}

/// A keyword trending in the last day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub keyword: String,
    #[serde(default)]
    pub current_count: u64,
    #[serde(default)]
    pub previous_count: u64,
    /// Relative growth (`0.5` = +50%), absent for brand new keywords.
    #[serde(default)]
    pub growth: Option<f64>,
    #[serde(default)]
    pub is_new: bool,
}

/// Named entities grouped by kind (`PERSON`, `ORG`, `GPE`, `EVENT`,
/// `PRODUCT`), each ranked as `(name, mentions)`.
pub type EntityReport = BTreeMap<String, Vec<(String, u64)>>;

/// An article quoted as an example of a topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicSample {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

/// A cluster discovered by the topic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub article_count: u64,
    #[serde(default)]
    pub sample_articles: Vec<TopicSample>,
}

/// Body of `GET /topics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub uncategorized_count: u64,
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
