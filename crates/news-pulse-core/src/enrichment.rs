//! Per-item enrichment cache.
//!
//! Each item of the current result set has two independent channels:
//!
//! | Channel | Value | Extra axis |
//! |---------|-------|------------|
//! | [`Channel::Summary`] | generated summary text | none |
//! | [`Channel::Related`] | semantically similar articles | `visible` flag |
//!
//! Both channels run the same four-state machine
//! (`Absent → Pending → Resolved | Failed`, with `Failed → Pending` on
//! retry). `Resolved` is terminal for the lifetime of the result set.
//! For the related channel, visibility is a separate bit: hiding a resolved
//! slot keeps its value so re-opening it costs no request.
//!
//! The cache is reset whenever the result set is replaced. A reset advances
//! the cache generation, so completions of requests issued before the reset
//! are recognised as stale and dropped.

use std::collections::HashMap;

use crate::error::PulseError;
use crate::generation::{Completion, Generation};
use crate::models::{ItemKey, RelatedArticle};

/// Fetch state of one enrichment slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Absent,
    Pending,
    Resolved(T),
    /// Holds a human-readable message. Retryable.
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Resolved(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// `Absent` and `Failed` slots accept a new request.
    fn accepts_request(&self) -> bool {
        matches!(self, FetchState::Absent | FetchState::Failed(_))
    }

    fn settle(&mut self, outcome: Result<T, PulseError>) {
        *self = match outcome {
            Ok(value) => FetchState::Resolved(value),
            Err(err) => FetchState::Failed(err.user_message()),
        };
    }
}

/// The two enrichment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Summary,
    Related,
}

/// Descriptor of an issued enrichment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentTicket {
    pub key: ItemKey,
    pub channel: Channel,
    /// Cache generation the request was issued under.
    pub generation: u64,
}

/// Result of [`EnrichmentCache::request_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryDecision {
    /// Slot moved to `Pending`; perform the request described by the ticket.
    Fetch(EnrichmentTicket),
    /// Summary already resolved; nothing to do.
    AlreadyAvailable,
    /// A request for this slot is already running.
    InFlight,
    /// The key is not part of the current result set.
    UnknownItem,
}

/// Result of [`EnrichmentCache::request_related`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedDecision {
    /// Slot moved to `Pending` and is shown; perform the request.
    Fetch(EnrichmentTicket),
    /// Slot made visible without a request (cached value or running fetch).
    Shown,
    /// Slot hidden; cached value kept.
    Hidden,
    /// The key is not part of the current result set.
    UnknownItem,
}

#[derive(Debug, Default)]
struct ItemSlots {
    summary: FetchState<String>,
    related: FetchState<Vec<RelatedArticle>>,
    related_visible: bool,
}

/// Enrichment state for every item of the current result set.
#[derive(Debug, Default)]
pub struct EnrichmentCache {
    generation: Generation,
    items: HashMap<ItemKey, ItemSlots>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every slot and start a fresh generation for `keys`.
    ///
    /// Requests still in flight from the previous generation will be
    /// reported as [`Completion::Stale`] when they finish.
    pub fn reset<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = ItemKey>,
    {
        self.generation.advance();
        self.items = keys
            .into_iter()
            .map(|key| (key, ItemSlots::default()))
            .collect();
    }

    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn request_summary(&mut self, key: &str) -> SummaryDecision {
        let generation = self.generation.current();
        let Some(slots) = self.items.get_mut(key) else {
            return SummaryDecision::UnknownItem;
        };
        if slots.summary.is_pending() {
            return SummaryDecision::InFlight;
        }
        if !slots.summary.accepts_request() {
            return SummaryDecision::AlreadyAvailable;
        }
        slots.summary = FetchState::Pending;
        SummaryDecision::Fetch(EnrichmentTicket {
            key: key.to_string(),
            channel: Channel::Summary,
            generation,
        })
    }

    /// Toggle the related panel of `key`, fetching only when nothing is
    /// cached or running.
    pub fn request_related(&mut self, key: &str) -> RelatedDecision {
        let generation = self.generation.current();
        let Some(slots) = self.items.get_mut(key) else {
            return RelatedDecision::UnknownItem;
        };
        if slots.related_visible {
            slots.related_visible = false;
            return RelatedDecision::Hidden;
        }
        slots.related_visible = true;
        if slots.related.accepts_request() {
            slots.related = FetchState::Pending;
            RelatedDecision::Fetch(EnrichmentTicket {
                key: key.to_string(),
                channel: Channel::Related,
                generation,
            })
        } else {
            RelatedDecision::Shown
        }
    }

    pub fn complete_summary(
        &mut self,
        ticket: &EnrichmentTicket,
        outcome: Result<String, PulseError>,
    ) -> Completion {
        match self.pending_slots(ticket, Channel::Summary) {
            Some(slots) => {
                slots.summary.settle(outcome);
                Completion::Applied
            }
            None => Completion::Stale,
        }
    }

    /// Settle the related slot. Visibility is left as the user last set it.
    pub fn complete_related(
        &mut self,
        ticket: &EnrichmentTicket,
        outcome: Result<Vec<RelatedArticle>, PulseError>,
    ) -> Completion {
        match self.pending_slots(ticket, Channel::Related) {
            Some(slots) => {
                slots.related.settle(outcome);
                Completion::Applied
            }
            None => Completion::Stale,
        }
    }

    fn pending_slots(
        &mut self,
        ticket: &EnrichmentTicket,
        channel: Channel,
    ) -> Option<&mut ItemSlots> {
        if ticket.channel != channel || !self.generation.is_current(ticket.generation) {
            return None;
        }
        let slots = self.items.get_mut(&ticket.key)?;
        let pending = match channel {
            Channel::Summary => slots.summary.is_pending(),
            Channel::Related => slots.related.is_pending(),
        };
        pending.then_some(slots)
    }

    pub fn summary(&self, key: &str) -> Option<&FetchState<String>> {
        self.items.get(key).map(|s| &s.summary)
    }

    pub fn related(&self, key: &str) -> Option<&FetchState<Vec<RelatedArticle>>> {
        self.items.get(key).map(|s| &s.related)
    }

    pub fn related_visible(&self, key: &str) -> bool {
        self.items.get(key).is_some_and(|s| s.related_visible)
    }

    /// Number of slots (across both channels) with a request in flight.
    pub fn pending_count(&self) -> usize {
        self.items
            .values()
            .map(|s| usize::from(s.summary.is_pending()) + usize::from(s.related.is_pending()))
            .sum()
    }
}
