//! Tracing subscriber setup for the `pulse` binary.
//!
//! Log lines go to stderr so stdout carries only command output. The
//! filter comes from `RUST_LOG` when set, otherwise from `logging.filter`
//! in the configuration; `--verbose` forces `debug`.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter directive: `--verbose` wins, then `RUST_LOG`, then the
/// configured default.
pub fn filter_directive(configured: &str, verbose: bool, env: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match env {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => configured.to_string(),
    }
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(configured: &str, verbose: bool) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(configured, verbose, env.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", directive, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_everything() {
        assert_eq!(filter_directive("warn", true, Some("trace")), "debug");
    }

    #[test]
    fn env_overrides_config() {
        assert_eq!(filter_directive("info", false, Some("news_pulse=trace")), "news_pulse=trace");
        assert_eq!(filter_directive("info", false, Some("  ")), "info");
        assert_eq!(filter_directive("warn", false, None), "warn");
    }
}
