//! `pulse search`: one-shot search with optional enrichment.

use anyhow::{bail, Result};
use news_pulse_core::controller::SearchCompletion;

use crate::render;
use crate::session::SearchSession;

/// Run a search, optionally jump to `page`, enrich the listed 1-based
/// positions, and print the result page.
pub async fn run_search(
    session: &SearchSession,
    query: &str,
    page: u32,
    summarize: &[usize],
    related: &[usize],
) -> Result<()> {
    match session.submit_query(query).await {
        None => {
            println!("No results.");
            return Ok(());
        }
        Some(SearchCompletion::Failed(err)) => bail!("{}", err.user_message()),
        Some(_) => {}
    }

    if page > 1 {
        match session.change_page(page).await {
            None => {
                let total = session.snapshot(|s| s.controller().total_pages());
                bail!("Page {} is out of range (1-{})", page, total.max(1));
            }
            Some(SearchCompletion::Failed(err)) => bail!("{}", err.user_message()),
            Some(_) => {}
        }
    }

    let summary_keys = keys_for(session, summarize)?;
    let related_keys = keys_for(session, related)?;

    if !summary_keys.is_empty() {
        session.summarize_all(summary_keys).await;
    }
    for key in &related_keys {
        session.request_related(key).await;
    }

    print!("{}", render::results(&session.results_view()));
    print!("{}", render::pager(&session.pager_view()));
    Ok(())
}

fn keys_for(session: &SearchSession, positions: &[usize]) -> Result<Vec<String>> {
    let mut keys = Vec::with_capacity(positions.len());
    for &pos in positions {
        match session.key_at(pos) {
            Some(key) => {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            None => bail!("No result at position {}", pos),
        }
    }
    Ok(keys)
}
