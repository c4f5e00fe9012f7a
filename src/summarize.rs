//! `pulse summarize`: summarize pasted text.

use anyhow::{bail, Context, Result};
use news_pulse_core::api::NewsApi;
use news_pulse_core::models::SummaryInput;
use news_pulse_core::PulseError;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Printed when the backend answers with an empty summary.
pub const NO_SUMMARY: &str = "No summary generated";

/// Text to summarize: the joined arguments, or all of stdin when there are
/// none.
pub async fn read_text(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .with_context(|| "Failed to read text from stdin")?;
    Ok(text)
}

pub async fn run_summarize(api: &dyn NewsApi, text: &str) -> Result<()> {
    let input = match SummaryInput::from_text(text) {
        Ok(input) => input,
        Err(PulseError::EmptyInput) => {
            bail!("Nothing to summarize: pass text as arguments or on stdin")
        }
        Err(err) => return Err(err.into()),
    };

    info!(chars = text.trim().len(), "summarizing text");
    let summary = match api.summarize(&input).await {
        Ok(summary) => summary,
        Err(err) => bail!("{}", err.user_message()),
    };
    let summary = summary.trim();
    println!("{}", if summary.is_empty() { NO_SUMMARY } else { summary });
    Ok(())
}
