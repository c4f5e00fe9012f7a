//! Session state: controller, enrichment cache, and breaking feed.
//!
//! [`PulseState`] is the single owner of all mutable session data. It
//! keeps the controller and the cache in lockstep: whenever a search
//! replaces the result set, the cache is reset to exactly the new set's
//! keys, which also invalidates every enrichment request still in flight.

use crate::breaking::BreakingFeed;
use crate::controller::{SearchCompletion, SearchController, SearchTicket};
use crate::enrichment::{EnrichmentCache, EnrichmentTicket, RelatedDecision, SummaryDecision};
use crate::error::PulseError;
use crate::generation::Completion;
use crate::models::{Article, BreakingStory, RelatedArticle, SearchPage};
use crate::pagination::PageBounds;

#[derive(Debug, Default)]
pub struct PulseState {
    controller: SearchController,
    cache: EnrichmentCache,
    breaking: BreakingFeed,
}

impl PulseState {
    pub fn new(bounds: PageBounds) -> Self {
        Self {
            controller: SearchController::new(bounds),
            cache: EnrichmentCache::new(),
            breaking: BreakingFeed::new(),
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    pub fn breaking(&self) -> &BreakingFeed {
        &self.breaking
    }

    // ── search ───────────────────────────────────────────────────────────

    pub fn submit_query(&mut self, text: &str) -> Result<SearchTicket, PulseError> {
        self.controller.submit(text)
    }

    pub fn change_page(&mut self, n: u32) -> Option<SearchTicket> {
        self.controller.change_page(n)
    }

    pub fn next_page(&mut self) -> Option<SearchTicket> {
        self.controller.next_page()
    }

    pub fn previous_page(&mut self) -> Option<SearchTicket> {
        self.controller.previous_page()
    }

    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchPage, PulseError>,
    ) -> SearchCompletion {
        let completion = self.controller.complete(ticket, outcome);
        if completion == SearchCompletion::Replaced {
            self.cache.reset(self.controller.keys().iter().cloned());
        }
        completion
    }

    // ── enrichment ───────────────────────────────────────────────────────

    /// Resolve a 1-based display position to an item key.
    pub fn key_at(&self, index: usize) -> Option<String> {
        self.controller.key_at(index).map(str::to_string)
    }

    pub fn article(&self, key: &str) -> Option<&Article> {
        self.controller.article(key)
    }

    pub fn request_summary(&mut self, key: &str) -> SummaryDecision {
        self.cache.request_summary(key)
    }

    pub fn request_related(&mut self, key: &str) -> RelatedDecision {
        self.cache.request_related(key)
    }

    pub fn complete_summary(
        &mut self,
        ticket: &EnrichmentTicket,
        outcome: Result<String, PulseError>,
    ) -> Completion {
        self.cache.complete_summary(ticket, outcome)
    }

    pub fn complete_related(
        &mut self,
        ticket: &EnrichmentTicket,
        outcome: Result<Vec<RelatedArticle>, PulseError>,
    ) -> Completion {
        self.cache.complete_related(ticket, outcome)
    }

    // ── breaking news ────────────────────────────────────────────────────

    pub fn apply_breaking(&mut self, stories: Vec<BreakingStory>) -> usize {
        self.breaking.apply_refresh(stories)
    }

    pub fn dismiss_breaking(&mut self, key: &str) -> bool {
        self.breaking.dismiss(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::FetchState;
    use crate::models::{Article, SearchMeta};

    fn page(prefix: &str, count: usize, total: u64) -> SearchPage {
        SearchPage {
            articles: (0..count)
                .map(|n| Article {
                    source: None,
                    author: None,
                    title: format!("{} {}", prefix, n),
                    description: Some("desc".to_string()),
                    url: format!("https://{}.example/{}", prefix, n),
                    url_to_image: None,
                    published_at: String::new(),
                    content: None,
                    sentiment: None,
                })
                .collect(),
            meta: SearchMeta {
                total_results: total,
                q: prefix.to_string(),
            },
        }
    }

    #[test]
    fn successful_search_resets_enrichment_to_new_keys() {
        let mut state = PulseState::default();
        let ticket = state.submit_query("rust").unwrap();
        state.complete_search(&ticket, Ok(page("rust", 3, 3)));
        assert_eq!(state.cache().len(), 3);

        let key = state.key_at(1).unwrap();
        let SummaryDecision::Fetch(summary) = state.request_summary(&key) else {
            panic!("expected fetch");
        };
        state.complete_summary(&summary, Ok("done".into()));

        let ticket = state.submit_query("go").unwrap();
        state.complete_search(&ticket, Ok(page("go", 2, 2)));
        assert_eq!(state.cache().len(), 2);
        assert!(state.cache().summary(&key).is_none());
        let new_key = state.key_at(1).unwrap();
        assert_eq!(state.cache().summary(&new_key), Some(&FetchState::Absent));
    }

    #[test]
    fn failed_search_keeps_enrichment() {
        let mut state = PulseState::default();
        let ticket = state.submit_query("rust").unwrap();
        state.complete_search(&ticket, Ok(page("rust", 60, 237)));
        let key = state.key_at(2).unwrap();
        let SummaryDecision::Fetch(summary) = state.request_summary(&key) else {
            panic!("expected fetch");
        };
        state.complete_summary(&summary, Ok("kept".into()));

        let ticket = state.change_page(2).unwrap();
        state.complete_search(&ticket, Err(PulseError::Network("down".into())));
        assert_eq!(
            state.cache().summary(&key).and_then(|s| s.value()).map(String::as_str),
            Some("kept")
        );
    }

    #[test]
    fn enrichment_from_superseded_generation_is_dropped() {
        let mut state = PulseState::default();
        let ticket = state.submit_query("rust").unwrap();
        state.complete_search(&ticket, Ok(page("shared", 2, 2)));
        let key = state.key_at(1).unwrap();
        let SummaryDecision::Fetch(summary) = state.request_summary(&key) else {
            panic!("expected fetch");
        };
        let RelatedDecision::Fetch(related) = state.request_related(&key) else {
            panic!("expected fetch");
        };

        // Same URLs come back for the new query: keys collide, generations do not.
        let ticket = state.submit_query("rust lang").unwrap();
        state.complete_search(&ticket, Ok(page("shared", 2, 2)));

        assert_eq!(state.complete_summary(&summary, Ok("old".into())), Completion::Stale);
        assert_eq!(state.complete_related(&related, Ok(vec![])), Completion::Stale);
        assert_eq!(state.cache().summary(&key), Some(&FetchState::Absent));
        assert!(!state.cache().related_visible(&key));
    }

    #[test]
    fn repeated_urls_keep_separate_slots() {
        let mut state = PulseState::default();
        let ticket = state.submit_query("chips").unwrap();
        let mut results = page("dup", 2, 2);
        results.articles[0].title = "First".to_string();
        results.articles[1].title = "Second".to_string();
        results.articles[1].url = results.articles[0].url.clone();
        state.complete_search(&ticket, Ok(results));
        assert_eq!(state.cache().len(), 2);

        let first = state.key_at(1).unwrap();
        let second = state.key_at(2).unwrap();
        assert_eq!(state.article(&second).map(|a| a.title.as_str()), Some("Second"));

        let SummaryDecision::Fetch(summary) = state.request_summary(&second) else {
            panic!("expected fetch");
        };
        state.complete_summary(&summary, Ok("s".into()));
        assert_eq!(state.cache().summary(&first), Some(&FetchState::Absent));
        assert_eq!(
            state.cache().summary(&second),
            Some(&FetchState::Resolved("s".to_string()))
        );
    }

    #[test]
    fn breaking_feed_is_independent_of_search() {
        let mut state = PulseState::default();
        state.apply_breaking(vec![BreakingStory {
            url: "u".into(),
            title: "t".into(),
            source: "s".into(),
            score: 70.0,
            article_count: 2,
            detected_at: None,
            novel_entities: vec![],
        }]);
        let ticket = state.submit_query("rust").unwrap();
        state.complete_search(&ticket, Ok(page("rust", 1, 1)));
        assert!(state.breaking().is_banner_visible());
        assert!(state.dismiss_breaking("u"));
        assert!(!state.breaking().is_banner_visible());
    }
}
