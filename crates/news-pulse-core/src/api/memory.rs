//! In-memory [`NewsApi`] implementation for testing and offline use.
//!
//! Data lives in `HashMap`s and `Vec`s behind `std::sync::RwLock`.
//! Search serves slices of a per-query article list; every other endpoint
//! returns whatever was seeded. Individual operations can be made to fail
//! with [`InMemoryNewsApi::fail`], and every call is counted so tests can
//! assert that a request was (or was not) issued.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::PulseError;
use crate::models::{
    Article, BreakingStory, EntityReport, RelatedArticle, SearchMeta, SearchPage, SummaryInput,
    TopicReport, Trend,
};

use super::NewsApi;

struct SeededQuery {
    articles: Vec<Article>,
    /// Reported `totalResults`; defaults to `articles.len()`.
    total: Option<u64>,
}

/// In-memory backend for tests and offline demos.
pub struct InMemoryNewsApi {
    queries: RwLock<HashMap<String, SeededQuery>>,
    summaries: RwLock<HashMap<String, String>>,
    related: RwLock<HashMap<String, Vec<RelatedArticle>>>,
    breaking: RwLock<Vec<BreakingStory>>,
    trends: RwLock<Vec<Trend>>,
    entities: RwLock<EntityReport>,
    topics: RwLock<TopicReport>,
    failures: RwLock<HashMap<String, PulseError>>,
    calls: RwLock<HashMap<String, usize>>,
}

impl InMemoryNewsApi {
    pub fn new() -> Self {
        Self {
            queries: RwLock::new(HashMap::new()),
            summaries: RwLock::new(HashMap::new()),
            related: RwLock::new(HashMap::new()),
            breaking: RwLock::new(Vec::new()),
            trends: RwLock::new(Vec::new()),
            entities: RwLock::new(EntityReport::new()),
            topics: RwLock::new(TopicReport::default()),
            failures: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the full result list for `query`.
    pub fn insert_query(&self, query: &str, articles: Vec<Article>) {
        self.queries.write().unwrap().insert(
            query.to_string(),
            SeededQuery {
                articles,
                total: None,
            },
        );
    }

    /// Seed `query` with a reported total that differs from the list length,
    /// mimicking a backend that caps how far results can be paged.
    pub fn insert_query_with_total(&self, query: &str, articles: Vec<Article>, total: u64) {
        self.queries.write().unwrap().insert(
            query.to_string(),
            SeededQuery {
                articles,
                total: Some(total),
            },
        );
    }

    /// Summary returned for the article titled `title`.
    pub fn insert_summary(&self, title: &str, summary: &str) {
        self.summaries
            .write()
            .unwrap()
            .insert(title.to_string(), summary.to_string());
    }

    pub fn insert_related(&self, url: &str, related: Vec<RelatedArticle>) {
        self.related.write().unwrap().insert(url.to_string(), related);
    }

    pub fn set_breaking(&self, stories: Vec<BreakingStory>) {
        *self.breaking.write().unwrap() = stories;
    }

    pub fn set_trends(&self, trends: Vec<Trend>) {
        *self.trends.write().unwrap() = trends;
    }

    pub fn set_entities(&self, entities: EntityReport) {
        *self.entities.write().unwrap() = entities;
    }

    pub fn set_topics(&self, topics: TopicReport) {
        *self.topics.write().unwrap() = topics;
    }

    /// Make calls matching `key` fail with `err` until [`recover`](Self::recover).
    ///
    /// Keys: `search:{query}`, `summarize:{title}`, `related:{url}`,
    /// `breaking`, `trends`, `entities`, `topics`.
    pub fn fail(&self, key: &str, err: PulseError) {
        self.failures.write().unwrap().insert(key.to_string(), err);
    }

    pub fn recover(&self, key: &str) {
        self.failures.write().unwrap().remove(key);
    }

    /// Number of calls made to `endpoint` (`search`, `summarize`, `related`,
    /// `breaking`, `trends`, `entities`, `topics`).
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.read().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn record(&self, endpoint: &str, failure_key: &str) -> Result<(), PulseError> {
        *self
            .calls
            .write()
            .unwrap()
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
        match self.failures.read().unwrap().get(failure_key) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryNewsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsApi for InMemoryNewsApi {
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, PulseError> {
        self.record("search", &format!("search:{}", query))?;
        let queries = self.queries.read().unwrap();
        let Some(seeded) = queries.get(query) else {
            return Ok(SearchPage {
                articles: Vec::new(),
                meta: SearchMeta {
                    total_results: 0,
                    q: query.to_string(),
                },
            });
        };
        let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let articles = seeded
            .articles
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(SearchPage {
            articles,
            meta: SearchMeta {
                total_results: seeded.total.unwrap_or(seeded.articles.len() as u64),
                q: query.to_string(),
            },
        })
    }

    async fn summarize(&self, input: &SummaryInput) -> Result<String, PulseError> {
        self.record("summarize", &format!("summarize:{}", input.title))?;
        Ok(self
            .summaries
            .read()
            .unwrap()
            .get(&input.title)
            .cloned()
            .unwrap_or_else(|| format!("Summary: {}", input.title)))
    }

    async fn related_by_url(
        &self,
        url: &str,
        _title: &str,
        top_k: u32,
    ) -> Result<Vec<RelatedArticle>, PulseError> {
        self.record("related", &format!("related:{}", url))?;
        Ok(self
            .related
            .read()
            .unwrap()
            .get(url)
            .map(|items| items.iter().take(top_k as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn related_by_index(
        &self,
        index: usize,
        top_k: u32,
    ) -> Result<Vec<RelatedArticle>, PulseError> {
        self.record("related", &format!("related:#{}", index))?;
        // Index into the concatenation of all seeded queries, in key order.
        let url = {
            let queries = self.queries.read().unwrap();
            let mut names: Vec<&String> = queries.keys().collect();
            names.sort();
            let found = names
                .into_iter()
                .flat_map(|name| queries[name].articles.iter())
                .nth(index)
                .map(|a| a.url.clone());
            found
        };
        let Some(url) = url else {
            return Err(PulseError::Http {
                status: 404,
                message: "Article not found".to_string(),
            });
        };
        Ok(self
            .related
            .read()
            .unwrap()
            .get(&url)
            .map(|items| items.iter().take(top_k as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn breaking(&self, threshold: u32) -> Result<Vec<BreakingStory>, PulseError> {
        self.record("breaking", "breaking")?;
        Ok(self
            .breaking
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.score >= f64::from(threshold))
            .cloned()
            .collect())
    }

    async fn trends(&self) -> Result<Vec<Trend>, PulseError> {
        self.record("trends", "trends")?;
        Ok(self.trends.read().unwrap().clone())
    }

    async fn entities(&self) -> Result<EntityReport, PulseError> {
        self.record("entities", "entities")?;
        Ok(self.entities.read().unwrap().clone())
    }

    async fn topics(
        &self,
        _lookback_hours: u32,
        _min_articles: u32,
    ) -> Result<TopicReport, PulseError> {
        self.record("topics", "topics")?;
        Ok(self.topics.read().unwrap().clone())
    }
}
