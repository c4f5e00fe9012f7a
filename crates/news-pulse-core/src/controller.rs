//! Search controller: query, page, and the active result set.
//!
//! The controller never performs I/O. [`SearchController::submit`] and
//! [`SearchController::change_page`] validate the action and return a
//! [`SearchTicket`]; the caller runs the search and passes the outcome to
//! [`SearchController::complete`].
//!
//! Only the most recently *issued* ticket can change state. A slow response
//! to an older query that finishes after a newer one has been issued is
//! dropped, so the result set always reflects the user's latest action.
//!
//! Query text, current page, result set, and meta are committed together on
//! success. A failed search records the error and leaves everything else as
//! it was.
//!
//! Each result carries an [`ItemKey`] that is unique within its set (see
//! [`item_keys`]). Positions, article lookups, and the enrichment cache all
//! go through these keys.

use std::collections::{HashMap, HashSet};

use crate::error::PulseError;
use crate::generation::Generation;
use crate::models::{Article, ItemKey, SearchMeta, SearchPage};
use crate::pagination::{page_window, PageBounds};

/// Enrichment keys for `articles`, in order.
///
/// An article is keyed by its URL. Syndicated copies repeating a URL within
/// the set get a `#n` suffix (`#2` for the second copy), so every position
/// owns its own slot.
pub fn item_keys(articles: &[Article]) -> Vec<ItemKey> {
    let mut repeats: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<ItemKey> = HashSet::new();
    articles
        .iter()
        .map(|article| {
            let n = repeats.entry(article.url.as_str()).or_insert(0);
            *n += 1;
            let mut key = if *n == 1 {
                article.url.clone()
            } else {
                format!("{}#{}", article.url, n)
            };
            while !taken.insert(key.clone()) {
                *n += 1;
                key = format!("{}#{}", article.url, n);
            }
            key
        })
        .collect()
}

/// Descriptor of an issued search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub generation: u64,
}

/// What [`SearchController::complete`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCompletion {
    /// Result set, meta, and pagination were replaced.
    Replaced,
    /// The search failed; prior results are untouched.
    Failed(PulseError),
    /// A newer search was issued meanwhile; the outcome was dropped.
    Stale,
}

#[derive(Debug)]
pub struct SearchController {
    bounds: PageBounds,
    query: Option<String>,
    current_page: u32,
    total_pages: u32,
    results: Vec<Article>,
    keys: Vec<ItemKey>,
    meta: Option<SearchMeta>,
    generation: Generation,
    pending: Option<SearchTicket>,
    last_error: Option<PulseError>,
}

impl SearchController {
    pub fn new(bounds: PageBounds) -> Self {
        Self {
            bounds,
            query: None,
            current_page: 1,
            total_pages: 0,
            results: Vec::new(),
            keys: Vec::new(),
            meta: None,
            generation: Generation::new(),
            pending: None,
            last_error: None,
        }
    }

    /// Start a new search for `text` at page 1.
    ///
    /// # Errors
    ///
    /// [`PulseError::EmptyInput`] if `text` is blank. State is unchanged.
    pub fn submit(&mut self, text: &str) -> Result<SearchTicket, PulseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PulseError::EmptyInput);
        }
        Ok(self.issue(text.to_string(), 1))
    }

    /// Navigate to page `n` of the current query.
    ///
    /// Returns `None` (no-op) when there is no committed query, when `n` is
    /// outside `1..=total_pages`, or when `n` is already the current page.
    pub fn change_page(&mut self, n: u32) -> Option<SearchTicket> {
        if n < 1 || n > self.total_pages || n == self.current_page {
            return None;
        }
        let query = self.query.clone()?;
        Some(self.issue(query, n))
    }

    pub fn next_page(&mut self) -> Option<SearchTicket> {
        self.change_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<SearchTicket> {
        self.change_page(self.current_page.saturating_sub(1))
    }

    fn issue(&mut self, query: String, page: u32) -> SearchTicket {
        let ticket = SearchTicket {
            query,
            page,
            page_size: self.bounds.page_size,
            generation: self.generation.advance(),
        };
        self.last_error = None;
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Apply the outcome of the search described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchPage, PulseError>,
    ) -> SearchCompletion {
        if !self.generation.is_current(ticket.generation) {
            return SearchCompletion::Stale;
        }
        self.pending = None;
        match outcome {
            Ok(page) => {
                self.total_pages = self.bounds.total_pages(page.meta.total_results);
                self.keys = item_keys(&page.articles);
                self.results = page.articles;
                self.meta = Some(page.meta);
                self.query = Some(ticket.query.clone());
                self.current_page = ticket.page;
                self.last_error = None;
                SearchCompletion::Replaced
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                SearchCompletion::Failed(err)
            }
        }
    }

    pub fn bounds(&self) -> PageBounds {
        self.bounds
    }

    /// Query of the displayed result set.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page_window(&self) -> Vec<u32> {
        page_window(self.current_page, self.total_pages)
    }

    pub fn results(&self) -> &[Article] {
        &self.results
    }

    pub fn meta(&self) -> Option<&SearchMeta> {
        self.meta.as_ref()
    }

    /// Article at 1-based display position `index`.
    pub fn article_at(&self, index: usize) -> Option<&Article> {
        index.checked_sub(1).and_then(|i| self.results.get(i))
    }

    /// Keys of the current results, parallel to [`results`](Self::results).
    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    /// Key of the result at 1-based display position `index`.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.keys.get(i))
            .map(String::as_str)
    }

    pub fn article(&self, key: &str) -> Option<&Article> {
        let i = self.keys.iter().position(|k| k == key)?;
        self.results.get(i)
    }

    /// True while the latest issued search has not completed.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&SearchTicket> {
        self.pending.as_ref()
    }

    pub fn last_error(&self) -> Option<&PulseError> {
        self.last_error.as_ref()
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(PageBounds::default())
    }
}
