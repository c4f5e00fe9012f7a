//! Gateway abstraction for the News Pulse backend.
//!
//! The [`NewsApi`] trait lists every remote operation the client needs,
//! enabling pluggable backends (the reqwest gateway in the application
//! crate, the in-memory fixture in [`memory`], future WASM fetch clients).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//! All failures are reported as [`PulseError`] so callers can store them
//! in controller or cache state.

pub mod memory;

use async_trait::async_trait;

use crate::error::PulseError;
use crate::models::{
    BreakingStory, EntityReport, RelatedArticle, SearchPage, SummaryInput, TopicReport, Trend,
};

/// Remote operations exposed by the News Pulse backend.
///
/// | Method | Endpoint |
/// |--------|----------|
/// | [`search`](NewsApi::search) | `GET /search?q=&page=&pageSize=` |
/// | [`summarize`](NewsApi::summarize) | `POST /summarize` |
/// | [`related_by_url`](NewsApi::related_by_url) | `GET /related-by-url?url=&title=&top_k=` |
/// | [`related_by_index`](NewsApi::related_by_index) | `GET /related/{index}?top_k=` |
/// | [`breaking`](NewsApi::breaking) | `GET /breaking?threshold=` |
/// | [`trends`](NewsApi::trends) | `GET /trends` |
/// | [`entities`](NewsApi::entities) | `GET /entities` |
/// | [`topics`](NewsApi::topics) | `GET /topics?lookback_hours=&min_articles=` |
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Fetch one page of search results.
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, PulseError>;

    /// Generate a summary for an article.
    async fn summarize(&self, input: &SummaryInput) -> Result<String, PulseError>;

    /// Articles similar to the one at `url`; `title` is used when the URL is
    /// unknown to the backend.
    async fn related_by_url(
        &self,
        url: &str,
        title: &str,
        top_k: u32,
    ) -> Result<Vec<RelatedArticle>, PulseError>;

    /// Articles similar to the backend's stored article at `index`.
    ///
    /// Index keys only stay meaningful while the backend's article list is
    /// unchanged; prefer [`related_by_url`](NewsApi::related_by_url).
    async fn related_by_index(&self, index: usize, top_k: u32)
        -> Result<Vec<RelatedArticle>, PulseError>;

    /// Stories scoring at least `threshold`.
    async fn breaking(&self, threshold: u32) -> Result<Vec<BreakingStory>, PulseError>;

    async fn trends(&self) -> Result<Vec<Trend>, PulseError>;

    async fn entities(&self) -> Result<EntityReport, PulseError>;

    async fn topics(
        &self,
        lookback_hours: u32,
        min_articles: u32,
    ) -> Result<TopicReport, PulseError>;
}
