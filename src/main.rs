//! # News Pulse CLI (`pulse`)
//!
//! The `pulse` binary searches the News Pulse backend from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! pulse --config ./config/pulse.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pulse search "<query>"` | Search and print one page of results |
//! | `pulse shell [query]` | Interactive search with paging and enrichment |
//! | `pulse home` | Featured articles and sentiment analytics (`--more N` reveals more) |
//! | `pulse summarize [text]` | Summarize text from the arguments or stdin |
//! | `pulse breaking` | Show breaking news (`--watch` keeps refreshing) |
//! | `pulse trends` | Trending keywords |
//! | `pulse entities` | Trending people, organizations, places |
//! | `pulse topics` | Discovered topic clusters |
//!
//! ## Examples
//!
//! ```bash
//! # Page 2 of a search, summarizing the first and third results
//! pulse search technology --page 2 --summarize 1 --summarize 3
//!
//! # Summarize a saved article
//! pulse summarize < article.txt
//!
//! # Interactive session against a remote backend
//! PULSE_API_BASE=https://pulse.example.com pulse shell climate
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use news_pulse::config;
use news_pulse::gateway::HttpGateway;
use news_pulse::session::{SearchSession, SessionSettings};
use news_pulse::{breaking, feeds, home, logging, search, shell, summarize};

/// News Pulse CLI: search, summarize, and follow breaking news from the
/// terminal.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means defaults (backend at `http://localhost:8000`).
#[derive(Parser)]
#[command(
    name = "pulse",
    about = "News Pulse: news search with summaries, related articles, and breaking news",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pulse.toml`. API, paging, breaking-news, and
    /// logging settings are read from this file.
    #[arg(long, global = true, default_value = "./config/pulse.toml")]
    config: PathBuf,

    /// Log at debug level regardless of configuration or `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search for articles.
    ///
    /// Prints one page of results with sentiment, followed by the pager.
    /// Results can be enriched before printing with `--summarize` and
    /// `--related`, which take 1-based result positions.
    Search {
        /// Search query. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Page to show (1-based).
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Summarize the result at this position. Repeatable.
        #[arg(long)]
        summarize: Vec<usize>,

        /// Show related articles for the result at this position. Repeatable.
        #[arg(long)]
        related: Vec<usize>,
    },

    /// Interactive search session.
    ///
    /// Reads commands from stdin; type `/help` for the list. Breaking news
    /// is refreshed in the background while the shell runs.
    Shell {
        /// Optional query to run on start.
        query: Vec<String>,
    },

    /// Show the featured feed with sentiment analytics.
    ///
    /// Six articles are shown at first; each `--more` reveals six more.
    Home {
        /// Extra batches of featured articles to reveal.
        #[arg(long, default_value_t = 0)]
        more: usize,
    },

    /// Summarize free text.
    ///
    /// Reads stdin when no text is given.
    Summarize {
        /// Text to summarize. Multiple words are joined with spaces.
        text: Vec<String>,
    },

    /// Show breaking news above the configured threshold.
    Breaking {
        /// Keep refreshing every `breaking.refresh_secs` until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },

    /// Show trending keywords from the last day.
    Trends,

    /// Show trending named entities.
    Entities,

    /// Show discovered topic clusters.
    Topics,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.filter, cli.verbose)?;

    let gateway = HttpGateway::new(&cfg.api)?;
    tracing::debug!(base_url = gateway.base_url(), "gateway ready");
    let session = SearchSession::new(Arc::new(gateway), SessionSettings::from_config(&cfg));
    let refresh = Duration::from_secs(cfg.breaking.refresh_secs);

    match cli.command {
        Commands::Search {
            query,
            page,
            summarize,
            related,
        } => {
            search::run_search(&session, &query.join(" "), page, &summarize, &related).await?;
        }
        Commands::Shell { query } => {
            let initial = (!query.is_empty()).then(|| query.join(" "));
            shell::run_shell(session, refresh, initial).await?;
        }
        Commands::Home { more } => {
            home::run_home(session.api().as_ref(), &cfg.home, more).await?;
        }
        Commands::Summarize { text } => {
            let text = summarize::read_text(&text).await?;
            summarize::run_summarize(session.api().as_ref(), &text).await?;
        }
        Commands::Breaking { watch } => {
            breaking::run_breaking(&session, refresh, watch).await?;
        }
        Commands::Trends => {
            feeds::run_trends(session.api().as_ref()).await?;
        }
        Commands::Entities => {
            feeds::run_entities(session.api().as_ref()).await?;
        }
        Commands::Topics => {
            feeds::run_topics(session.api().as_ref(), &cfg.topics).await?;
        }
    }

    Ok(())
}
