//! Generation tags for stale-response suppression.
//!
//! Every request issued against a mutable target (the active result set, or
//! the enrichment slots of that set) carries the generation that was current
//! when it was issued. Advancing the generation invalidates everything that
//! is still in flight.

/// Monotonic version counter for one mutable target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub fn new() -> Self {
        Self(0)
    }

    /// Current tag value.
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Invalidate all outstanding tags and return the new one.
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, tag: u64) -> bool {
        self.0 == tag
    }
}

/// What happened to a completion handed back to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was written into the target slot.
    Applied,
    /// The target moved on since the request was issued; the outcome was dropped.
    Stale,
}
