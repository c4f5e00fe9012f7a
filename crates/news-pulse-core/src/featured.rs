//! Featured articles on the home screen.
//!
//! The home screen shows the first page of a fixed query and reveals it
//! [`FEATURED_STEP`] articles at a time. The feed is fetched once and never
//! enriched, so it has no ticket flow of its own.

use crate::controller::item_keys;
use crate::models::{Article, ItemKey, SentimentLabel};

/// Query behind the featured feed.
pub const DEFAULT_FEATURED_QUERY: &str = "technology";

/// Articles requested for the featured feed.
pub const DEFAULT_FEATURED_PAGE_SIZE: u32 = 12;

/// Articles shown initially and added by each [`FeaturedFeed::load_more`].
pub const FEATURED_STEP: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct FeaturedFeed {
    articles: Vec<Article>,
    keys: Vec<ItemKey>,
    shown: usize,
}

impl FeaturedFeed {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            keys: item_keys(&articles),
            shown: FEATURED_STEP.min(articles.len()),
            articles,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Articles revealed so far, with their keys.
    pub fn shown(&self) -> impl Iterator<Item = (&ItemKey, &Article)> {
        self.keys.iter().zip(&self.articles).take(self.shown)
    }

    pub fn shown_count(&self) -> usize {
        self.shown
    }

    pub fn remaining(&self) -> usize {
        self.articles.len() - self.shown
    }

    /// Reveal up to [`FEATURED_STEP`] more articles. Returns how many were
    /// added.
    pub fn load_more(&mut self) -> usize {
        let before = self.shown;
        self.shown = (self.shown + FEATURED_STEP).min(self.articles.len());
        self.shown - before
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats::of(&self.articles)
    }
}

/// Sentiment analytics over the whole feed, revealed or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub latest: usize,
    /// Articles carrying a sentiment label.
    pub analyzed: usize,
    /// Mean classifier confidence in whole percent; 0 when nothing is scored.
    pub average_confidence: u8,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl FeedStats {
    pub fn of(articles: &[Article]) -> Self {
        let mut stats = FeedStats {
            latest: articles.len(),
            ..Self::default()
        };
        let mut scores = Vec::new();
        for sentiment in articles.iter().filter_map(|a| a.sentiment.as_ref()) {
            stats.analyzed += 1;
            match sentiment.label {
                SentimentLabel::Positive => stats.positive += 1,
                SentimentLabel::Negative => stats.negative += 1,
                SentimentLabel::Neutral => stats.neutral += 1,
                SentimentLabel::Unknown => {}
            }
            if let Some(score) = sentiment.score.filter(|s| *s > 0.0) {
                scores.push(score.clamp(0.0, 1.0));
            }
        }
        if !scores.is_empty() {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            stats.average_confidence = (mean * 100.0).round() as u8;
        }
        stats
    }
}
