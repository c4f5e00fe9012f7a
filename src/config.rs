//! TOML configuration for the `pulse` client.
//!
//! Every section and field has a serde default, so an empty file (or no
//! file at all) yields a working configuration pointed at a local backend.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//!
//! [search]
//! page_size = 50
//! page_cap = 20
//!
//! [breaking]
//! threshold = 60
//! refresh_secs = 300
//!
//! [home]
//! query = "technology"
//! page_size = 12
//! ```

use anyhow::{Context, Result};
use news_pulse_core::featured::{DEFAULT_FEATURED_PAGE_SIZE, DEFAULT_FEATURED_QUERY};
use news_pulse_core::pagination::{PageBounds, DEFAULT_PAGE_CAP, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `api.base_url`.
pub const API_BASE_ENV: &str = "PULSE_API_BASE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub related: RelatedConfig,
    #[serde(default)]
    pub breaking: BreakingConfig,
    #[serde(default)]
    pub topics: TopicsConfig,
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_cap")]
    pub page_cap: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_cap: default_page_cap(),
        }
    }
}

impl SearchConfig {
    pub fn bounds(&self) -> PageBounds {
        PageBounds::new(self.page_size, self.page_cap)
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_page_cap() -> u32 {
    DEFAULT_PAGE_CAP
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelatedConfig {
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct BreakingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for BreakingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_threshold() -> u32 {
    60
}
fn default_refresh_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct TopicsConfig {
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    #[serde(default = "default_min_articles")]
    pub min_articles: u32,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            min_articles: default_min_articles(),
        }
    }
}

fn default_lookback_hours() -> u32 {
    24
}
fn default_min_articles() -> u32 {
    15
}

/// Featured feed shown by `pulse home`.
#[derive(Debug, Deserialize, Clone)]
pub struct HomeConfig {
    #[serde(default = "default_featured_query")]
    pub query: String,
    #[serde(default = "default_featured_page_size")]
    pub page_size: u32,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            query: default_featured_query(),
            page_size: default_featured_page_size(),
        }
    }
}

fn default_featured_query() -> String {
    DEFAULT_FEATURED_QUERY.to_string()
}
fn default_featured_page_size() -> u32 {
    DEFAULT_FEATURED_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// Load and validate the configuration at `path`.
///
/// A missing file yields the defaults. `PULSE_API_BASE`, when set and
/// non-empty, replaces `api.base_url`.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content)?
    } else {
        Config::default()
    };

    if let Ok(base) = std::env::var(API_BASE_ENV) {
        if !base.trim().is_empty() {
            config.api.base_url = base.trim().to_string();
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Parse a configuration document without touching the environment.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let base = config.api.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!(
            "api.base_url must start with http:// or https:// (got '{}')",
            config.api.base_url
        );
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    if config.search.page_size == 0 {
        anyhow::bail!("search.page_size must be > 0");
    }
    if config.search.page_cap == 0 {
        anyhow::bail!("search.page_cap must be > 0");
    }

    if config.related.top_k == 0 {
        anyhow::bail!("related.top_k must be > 0");
    }

    if config.breaking.refresh_secs == 0 {
        anyhow::bail!("breaking.refresh_secs must be > 0");
    }
    if config.breaking.threshold > 100 {
        anyhow::bail!("breaking.threshold must be in [0, 100]");
    }

    if config.home.query.trim().is_empty() {
        anyhow::bail!("home.query must not be empty");
    }
    if config.home.page_size == 0 {
        anyhow::bail!("home.page_size must be > 0");
    }

    Ok(())
}
