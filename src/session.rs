//! Async orchestration of one interactive search session.
//!
//! A [`SearchSession`] pairs a [`NewsApi`] backend with the session's
//! [`PulseState`]. Every public method follows the same three steps:
//!
//! 1. Lock the state, ask it what to do, and take a ticket. The lock is
//!    released before anything is awaited.
//! 2. Await the backend call for that ticket.
//! 3. Lock the state again and hand back the outcome. The state drops it if
//!    a newer search or page change happened in the meantime.
//!
//! Sessions are cheap to clone; clones share the same state, so
//! enrichment for several items can run concurrently on separate tasks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use news_pulse_core::api::NewsApi;
use news_pulse_core::controller::{SearchCompletion, SearchTicket};
use news_pulse_core::enrichment::{RelatedDecision, SummaryDecision};
use news_pulse_core::generation::Completion;
use news_pulse_core::models::SummaryInput;
use news_pulse_core::pagination::PageBounds;
use news_pulse_core::view::{self, ArticleView, BannerLine, PagerView};
use news_pulse_core::{PulseError, PulseState};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Per-session knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub bounds: PageBounds,
    pub related_top_k: u32,
    pub breaking_threshold: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            bounds: PageBounds::default(),
            related_top_k: 3,
            breaking_threshold: 60,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bounds: config.search.bounds(),
            related_top_k: config.related.top_k,
            breaking_threshold: config.breaking.threshold,
        }
    }
}

/// What a summary or related-items request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// A backend call was made; the completion says whether it was applied.
    Fetched(Completion),
    /// The summary was already resolved.
    AlreadyAvailable,
    /// A request for this slot is already running.
    InFlight,
    /// Related panel shown from cache or from the request already running.
    Shown,
    /// Related panel hidden.
    Hidden,
    /// The key is not part of the current result set.
    UnknownItem,
}

#[derive(Clone)]
pub struct SearchSession {
    api: Arc<dyn NewsApi>,
    state: Arc<Mutex<PulseState>>,
    settings: SessionSettings,
}

impl SearchSession {
    pub fn new(api: Arc<dyn NewsApi>, settings: SessionSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(PulseState::new(settings.bounds))),
            api,
            settings,
        }
    }

    pub fn api(&self) -> &Arc<dyn NewsApi> {
        &self.api
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, PulseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the state under the lock.
    pub fn snapshot<R>(&self, f: impl FnOnce(&PulseState) -> R) -> R {
        f(&self.lock())
    }

    // ── search ───────────────────────────────────────────────────────────

    /// Search for `text` from page 1. Blank input is ignored (`None`).
    pub async fn submit_query(&self, text: &str) -> Option<SearchCompletion> {
        let submitted = self.lock().submit_query(text);
        let ticket = match submitted {
            Ok(ticket) => ticket,
            Err(err) => {
                debug!(error = %err, "query ignored");
                return None;
            }
        };
        Some(self.run_search(ticket).await)
    }

    /// Go to page `n`. Out-of-range, current, or query-less requests are
    /// ignored (`None`).
    pub async fn change_page(&self, n: u32) -> Option<SearchCompletion> {
        let ticket = self.lock().change_page(n);
        let Some(ticket) = ticket else {
            debug!(page = n, "page change ignored");
            return None;
        };
        Some(self.run_search(ticket).await)
    }

    pub async fn next_page(&self) -> Option<SearchCompletion> {
        let ticket = self.lock().next_page()?;
        Some(self.run_search(ticket).await)
    }

    pub async fn previous_page(&self) -> Option<SearchCompletion> {
        let ticket = self.lock().previous_page()?;
        Some(self.run_search(ticket).await)
    }

    async fn run_search(&self, ticket: SearchTicket) -> SearchCompletion {
        info!(query = %ticket.query, page = ticket.page, "searching");
        let outcome = self
            .api
            .search(&ticket.query, ticket.page, ticket.page_size)
            .await;
        let completion = self.lock().complete_search(&ticket, outcome);
        match &completion {
            SearchCompletion::Replaced => {
                debug!(generation = ticket.generation, "results replaced")
            }
            SearchCompletion::Failed(err) => warn!(error = %err, "search failed"),
            SearchCompletion::Stale => {
                debug!(generation = ticket.generation, "stale search dropped")
            }
        }
        completion
    }

    // ── enrichment ───────────────────────────────────────────────────────

    /// Key of the item at 1-based position `index` in the current results.
    pub fn key_at(&self, index: usize) -> Option<String> {
        self.lock().key_at(index)
    }

    /// Fetch the summary for `key` unless it is cached or already running.
    pub async fn request_summary(&self, key: &str) -> EnrichOutcome {
        let (ticket, input) = {
            let mut state = self.lock();
            let Some(input) = state.article(key).map(SummaryInput::from) else {
                return EnrichOutcome::UnknownItem;
            };
            match state.request_summary(key) {
                SummaryDecision::Fetch(ticket) => (ticket, input),
                SummaryDecision::AlreadyAvailable => {
                    debug!(key, "summary cached");
                    return EnrichOutcome::AlreadyAvailable;
                }
                SummaryDecision::InFlight => {
                    debug!(key, "summary already in flight");
                    return EnrichOutcome::InFlight;
                }
                SummaryDecision::UnknownItem => return EnrichOutcome::UnknownItem,
            }
        };

        info!(key, "summarizing");
        let outcome = self.api.summarize(&input).await;
        if let Err(err) = &outcome {
            warn!(key, error = %err, "summary failed");
        }
        let completion = self.lock().complete_summary(&ticket, outcome);
        if completion == Completion::Stale {
            debug!(key, "stale summary dropped");
        }
        EnrichOutcome::Fetched(completion)
    }

    /// Summarize several items concurrently. Results come back in
    /// completion order.
    pub async fn summarize_all(&self, keys: Vec<String>) -> Vec<(String, EnrichOutcome)> {
        let mut set = JoinSet::new();
        for key in keys {
            let session = self.clone();
            set.spawn(async move {
                let outcome = session.request_summary(&key).await;
                (key, outcome)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(err) => warn!(error = %err, "summary task failed"),
            }
        }
        results
    }

    /// Toggle the related panel for `key`, fetching only when nothing is
    /// cached or running.
    pub async fn request_related(&self, key: &str) -> EnrichOutcome {
        let (ticket, url, title) = {
            let mut state = self.lock();
            let Some((url, title)) = state
                .article(key)
                .map(|a| (a.url.clone(), a.title.clone()))
            else {
                return EnrichOutcome::UnknownItem;
            };
            match state.request_related(key) {
                RelatedDecision::Fetch(ticket) => (ticket, url, title),
                RelatedDecision::Shown => {
                    debug!(key, "related shown without fetch");
                    return EnrichOutcome::Shown;
                }
                RelatedDecision::Hidden => return EnrichOutcome::Hidden,
                RelatedDecision::UnknownItem => return EnrichOutcome::UnknownItem,
            }
        };

        info!(key, "fetching related articles");
        let outcome = self
            .api
            .related_by_url(&url, &title, self.settings.related_top_k)
            .await;
        if let Err(err) = &outcome {
            warn!(key, error = %err, "related fetch failed");
        }
        let completion = self.lock().complete_related(&ticket, outcome);
        if completion == Completion::Stale {
            debug!(key, "stale related result dropped");
        }
        EnrichOutcome::Fetched(completion)
    }

    // ── breaking news ────────────────────────────────────────────────────

    /// Fetch breaking stories and apply them to the feed.
    ///
    /// On failure the previous visible set is kept.
    pub async fn refresh_breaking(&self) -> Result<usize, PulseError> {
        let stories = self.api.breaking(self.settings.breaking_threshold).await?;
        let visible = self.lock().apply_breaking(stories);
        debug!(visible, "breaking feed refreshed");
        Ok(visible)
    }

    pub fn dismiss_breaking(&self, key: &str) -> bool {
        self.lock().dismiss_breaking(key)
    }

    /// Key of the visible breaking story at 1-based position `index`.
    pub fn breaking_key_at(&self, index: usize) -> Option<String> {
        self.snapshot(|state| {
            index
                .checked_sub(1)
                .and_then(|i| state.breaking().visible().get(i))
                .map(|story| story.url.clone())
        })
    }

    // ── views ────────────────────────────────────────────────────────────

    pub fn results_view(&self) -> Vec<ArticleView> {
        self.snapshot(|state| view::project_results(state.controller(), state.cache()))
    }

    pub fn pager_view(&self) -> PagerView {
        self.snapshot(|state| view::project_pager(state.controller()))
    }

    pub fn banner_view(&self, now: DateTime<Utc>) -> Vec<BannerLine> {
        self.snapshot(|state| view::project_breaking(state.breaking(), now))
    }
}
