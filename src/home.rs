//! `pulse home`: the featured feed with sentiment analytics.
//!
//! The featured query and the trend list are fetched together. A trend
//! failure only zeroes the trending count; a featured failure is an error.

use anyhow::{bail, Result};
use news_pulse_core::api::NewsApi;
use news_pulse_core::featured::FeaturedFeed;
use news_pulse_core::view::project_featured;
use tracing::{debug, warn};

use crate::config::HomeConfig;
use crate::render;

/// Print the featured feed with `more` extra reveals applied.
pub async fn run_home(api: &dyn NewsApi, config: &HomeConfig, more: usize) -> Result<()> {
    let (featured, trends) = tokio::join!(
        api.search(&config.query, 1, config.page_size),
        api.trends()
    );
    let page = match featured {
        Ok(page) => page,
        Err(err) => bail!("{}", err.user_message()),
    };
    let trending = match trends {
        Ok(trends) => trends.len(),
        Err(err) => {
            warn!(error = %err, "trends unavailable");
            0
        }
    };

    let mut feed = FeaturedFeed::new(page.articles);
    for _ in 0..more {
        if feed.load_more() == 0 {
            break;
        }
    }
    debug!(shown = feed.shown_count(), remaining = feed.remaining(), "featured feed");

    println!("Featured: {}\n", config.query.trim());
    print!(
        "{}",
        render::featured(&project_featured(&feed), feed.remaining(), more + 1)
    );
    print!("{}", render::feed_stats(&feed.stats(), trending));
    Ok(())
}
