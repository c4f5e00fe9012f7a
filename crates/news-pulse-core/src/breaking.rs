//! Breaking-news feed with per-story dismissal.
//!
//! The feed is refreshed periodically with the full list of stories above a
//! score threshold. Dismissed keys (story URLs) live in a
//! [`DismissalTracker`] that survives refreshes, so a dismissed story stays
//! hidden even though the next refresh fetches it again. The banner is
//! visible only while at least one undismissed story remains.

use std::collections::HashSet;

use crate::models::BreakingStory;

/// In-memory set of dismissed story keys.
#[derive(Debug, Default, Clone)]
pub struct DismissalTracker {
    keys: HashSet<String>,
}

impl DismissalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dismissed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if the key was not already dismissed.
    pub fn dismiss(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Urgency tier derived from a story's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Urgent,
    Breaking,
    Developing,
}

impl UrgencyTier {
    pub const URGENT_THRESHOLD: f64 = 80.0;
    pub const BREAKING_THRESHOLD: f64 = 60.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::URGENT_THRESHOLD {
            UrgencyTier::Urgent
        } else if score >= Self::BREAKING_THRESHOLD {
            UrgencyTier::Breaking
        } else {
            UrgencyTier::Developing
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Urgent => "URGENT",
            UrgencyTier::Breaking => "BREAKING",
            UrgencyTier::Developing => "DEVELOPING",
        }
    }

    /// Banner color name: red, orange, or yellow.
    pub fn color(&self) -> &'static str {
        match self {
            UrgencyTier::Urgent => "red",
            UrgencyTier::Breaking => "orange",
            UrgencyTier::Developing => "yellow",
        }
    }
}

/// Visible breaking stories plus the dismissal set that filters them.
#[derive(Debug, Default)]
pub struct BreakingFeed {
    dismissed: DismissalTracker,
    visible: Vec<BreakingStory>,
    refreshes: u64,
}

impl BreakingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible set with `fetched`, minus dismissed stories.
    ///
    /// Returns the number of stories now visible.
    pub fn apply_refresh(&mut self, fetched: Vec<BreakingStory>) -> usize {
        let dismissed = &self.dismissed;
        self.visible = fetched
            .into_iter()
            .filter(|story| !dismissed.is_dismissed(&story.url))
            .collect();
        self.refreshes += 1;
        self.visible.len()
    }

    /// Dismiss `key` and drop it from the visible set immediately.
    pub fn dismiss(&mut self, key: &str) -> bool {
        let added = self.dismissed.dismiss(key);
        self.visible.retain(|story| story.url != key);
        added
    }

    pub fn visible(&self) -> &[BreakingStory] {
        &self.visible
    }

    pub fn is_banner_visible(&self) -> bool {
        !self.visible.is_empty()
    }

    pub fn dismissals(&self) -> &DismissalTracker {
        &self.dismissed
    }

    /// Number of refreshes applied so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
