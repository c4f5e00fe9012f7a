//! Read-only feeds: `pulse trends`, `pulse entities`, `pulse topics`.
//!
//! These fetch once and print. There is no state to keep between calls.

use anyhow::{Context, Result};
use news_pulse_core::api::NewsApi;

use crate::config::TopicsConfig;
use crate::render;

pub async fn run_trends(api: &dyn NewsApi) -> Result<()> {
    let trends = api
        .trends()
        .await
        .with_context(|| "Failed to load trends")?;
    print!("{}", render::trends(&trends));
    Ok(())
}

pub async fn run_entities(api: &dyn NewsApi) -> Result<()> {
    let report = api
        .entities()
        .await
        .with_context(|| "Failed to load entities")?;
    print!("{}", render::entities(&report));
    Ok(())
}

pub async fn run_topics(api: &dyn NewsApi, config: &TopicsConfig) -> Result<()> {
    let report = api
        .topics(config.lookback_hours, config.min_articles)
        .await
        .with_context(|| "Failed to load topics")?;
    print!("{}", render::topics(&report));
    Ok(())
}
