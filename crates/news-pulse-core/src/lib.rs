//! # News Pulse Core
//!
//! Shared, WASM-safe logic for News Pulse: data models, the error
//! taxonomy, the [`api::NewsApi`] gateway trait, pagination bounds, the
//! per-item enrichment cache, the search controller, the breaking-news
//! dismissal feed, the featured home feed, and the pure view projection.
//!
//! This crate contains no tokio, reqwest, or other native-only
//! dependencies. Every state transition is a synchronous method that hands
//! back a generation-tagged ticket; the caller performs the I/O and returns
//! the outcome together with the ticket, and the state decides whether the
//! outcome is still current.
//!
//! ```text
//!  user action ──▶ PulseState::request_* ──▶ ticket ──▶ NewsApi call
//!                        ▲                                   │
//!                        └──── PulseState::complete_* ◀──────┘
//!                              (stale tickets discarded)
//! ```

pub mod api;
pub mod breaking;
pub mod controller;
pub mod enrichment;
pub mod error;
pub mod featured;
pub mod generation;
pub mod models;
pub mod pagination;
pub mod state;
pub mod view;

pub use error::PulseError;
pub use state::PulseState;
