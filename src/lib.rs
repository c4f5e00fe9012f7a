//! # News Pulse
//!
//! A terminal client for the News Pulse backend: paginated news search with
//! on-demand summaries and related articles, a dismissible breaking-news
//! banner, a featured home feed, free-text summaries, and read-only trend,
//! entity, and topic feeds.
//!
//! All state transitions live in [`news_pulse_core`]. This crate supplies
//! the native pieces around it: configuration, logging, the reqwest
//! gateway, the tokio-driven session, and the `pulse` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//! │ pulse CLI│──▶│ SearchSession │──▶│ HttpGateway  │──▶ backend
//! │ / shell  │   │ (PulseState)  │   │  (NewsApi)   │
//! └──────────┘   └──────┬────────┘   └──────────────┘
//!                       ▲
//!                ┌──────┴────────┐
//!                │ BreakingWatch │ (periodic refresh)
//!                └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | tracing subscriber setup |
//! | [`gateway`] | reqwest implementation of `NewsApi` |
//! | [`session`] | Async orchestration over `PulseState` |
//! | [`breaking`] | Periodic breaking-news refresh |
//! | [`search`] | `pulse search` |
//! | [`shell`] | `pulse shell` |
//! | [`summarize`] | `pulse summarize` |
//! | [`home`] | `pulse home` |
//! | [`feeds`] | `pulse trends`, `pulse entities`, `pulse topics` |
//! | [`render`] | Plain-text rendering |

pub mod breaking;
pub mod config;
pub mod feeds;
pub mod gateway;
pub mod home;
pub mod logging;
pub mod render;
pub mod search;
pub mod session;
pub mod shell;
pub mod summarize;
