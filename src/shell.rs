//! `pulse shell`: interactive search over stdin.
//!
//! Plain text searches; slash commands navigate and enrich. The breaking
//! watch runs in the background for the whole session and announces when
//! stories are waiting.
//!
//! Commands that need the backend run as tasks in [`Jobs`], so input keeps
//! being read while they are in flight. Output is printed as each one
//! finishes. Leaving with `/quit` or end of input waits for commands
//! already typed.

use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use news_pulse_core::controller::SearchCompletion;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::breaking::BreakingWatch;
use crate::render;
use crate::session::{EnrichOutcome, SearchSession};

pub const HELP: &str = "\
commands:
  <text>             search for <text>
  /search <text>     search for <text>
  /page <n>          go to page n
  /next, /prev       next or previous page
  /summarize <i>...  summarize results at positions i (space or comma separated)
  /related <i>       show or hide related articles for result i
  /breaking          refresh and show breaking news
  /dismiss <i>       dismiss breaking story i
  /help              this text
  /quit              leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    Page(u32),
    Next,
    Prev,
    Summarize(Vec<usize>),
    Related(usize),
    Breaking,
    Dismiss(usize),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ShellCommand::Search(line.to_string());
    };
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    match cmd {
        "search" | "s" if !arg.is_empty() => ShellCommand::Search(arg.to_string()),
        "search" | "s" => ShellCommand::Invalid("usage: /search <text>".to_string()),
        "page" | "p" => arg
            .parse()
            .map(ShellCommand::Page)
            .unwrap_or_else(|_| ShellCommand::Invalid("usage: /page <n>".to_string())),
        "next" | "n" => ShellCommand::Next,
        "prev" => ShellCommand::Prev,
        "summarize" | "sum" => {
            let positions: Result<Vec<usize>, _> = arg
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match positions {
                Ok(p) if !p.is_empty() => ShellCommand::Summarize(p),
                _ => ShellCommand::Invalid("usage: /summarize <i>...".to_string()),
            }
        }
        "related" | "rel" => arg
            .parse()
            .map(ShellCommand::Related)
            .unwrap_or_else(|_| ShellCommand::Invalid("usage: /related <i>".to_string())),
        "breaking" | "b" => ShellCommand::Breaking,
        "dismiss" => arg
            .parse()
            .map(ShellCommand::Dismiss)
            .unwrap_or_else(|_| ShellCommand::Invalid("usage: /dismiss <i>".to_string())),
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command: /{} (try /help)", other)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Run one command against the session and return what to print.
pub async fn execute(session: &SearchSession, command: ShellCommand) -> Flow {
    let out = match command {
        ShellCommand::Quit => return Flow::Quit,
        ShellCommand::Empty => String::new(),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Invalid(msg) => format!("{}\n", msg),
        ShellCommand::Search(text) => {
            search_output(session, session.submit_query(&text).await)
        }
        ShellCommand::Page(n) => match session.change_page(n).await {
            None => no_such_page(session),
            completion => search_output(session, completion),
        },
        ShellCommand::Next => match session.next_page().await {
            None => "Already on the last page.\n".to_string(),
            completion => search_output(session, completion),
        },
        ShellCommand::Prev => match session.previous_page().await {
            None => "Already on the first page.\n".to_string(),
            completion => search_output(session, completion),
        },
        ShellCommand::Summarize(positions) => {
            let mut keys = Vec::new();
            for pos in &positions {
                match session.key_at(*pos) {
                    Some(key) => keys.push(key),
                    None => {
                        return Flow::Continue(format!("No result at position {}.\n", pos))
                    }
                }
            }
            session.summarize_all(keys).await;
            articles_at(session, &positions)
        }
        ShellCommand::Related(pos) => match session.key_at(pos) {
            Some(key) => match session.request_related(&key).await {
                EnrichOutcome::Hidden => format!("Related articles for {} hidden.\n", pos),
                _ => articles_at(session, &[pos]),
            },
            None => format!("No result at position {}.\n", pos),
        },
        ShellCommand::Breaking => {
            let mut out = String::new();
            if let Err(err) = session.refresh_breaking().await {
                out.push_str(&format!("error: {}\n", err.user_message()));
            }
            out.push_str(&render::banner(&session.banner_view(Utc::now())));
            out
        }
        ShellCommand::Dismiss(pos) => match session.breaking_key_at(pos) {
            Some(key) => {
                session.dismiss_breaking(&key);
                render::banner(&session.banner_view(Utc::now()))
            }
            None => format!("No breaking story at position {}.\n", pos),
        },
    };
    Flow::Continue(out)
}

fn search_output(session: &SearchSession, completion: Option<SearchCompletion>) -> String {
    match completion {
        None | Some(SearchCompletion::Stale) => String::new(),
        Some(SearchCompletion::Failed(err)) => format!("error: {}\n", err.user_message()),
        Some(SearchCompletion::Replaced) => format!(
            "{}{}",
            render::results(&session.results_view()),
            render::pager(&session.pager_view())
        ),
    }
}

fn no_such_page(session: &SearchSession) -> String {
    let total = session.snapshot(|s| s.controller().total_pages());
    if total == 0 {
        "Nothing to page through.\n".to_string()
    } else {
        format!("No such page (1-{}).\n", total)
    }
}

fn articles_at(session: &SearchSession, positions: &[usize]) -> String {
    session
        .results_view()
        .iter()
        .filter(|v| positions.contains(&v.index))
        .map(render::article)
        .collect()
}

/// Commands in flight for one shell.
///
/// Searches and page changes run as navigation; summaries, related items,
/// and breaking refreshes run in the background. Commands that read the
/// result list wait while navigation is running, then start in the order
/// they were typed. A new search does not wait: it supersedes the one in
/// flight.
pub struct Jobs {
    session: SearchSession,
    navigation: JoinSet<String>,
    background: JoinSet<String>,
    deferred: VecDeque<ShellCommand>,
}

impl Jobs {
    pub fn new(session: SearchSession) -> Self {
        Self {
            session,
            navigation: JoinSet::new(),
            background: JoinSet::new(),
            deferred: VecDeque::new(),
        }
    }

    /// Start `command`, or queue it behind running navigation.
    ///
    /// Commands answered from local state return their output here; the
    /// rest report through [`Jobs::next_finished`].
    pub async fn submit(&mut self, command: ShellCommand) -> Option<String> {
        if is_local(&command) {
            return match execute(&self.session, command).await {
                Flow::Continue(out) => Some(out),
                Flow::Quit => None,
            };
        }
        let must_wait = reads_results(&command) && !self.navigation.is_empty();
        if must_wait || !self.deferred.is_empty() {
            debug!(?command, "queued behind navigation");
            self.deferred.push_back(command);
            return None;
        }
        self.spawn(command);
        None
    }

    /// Wait for the next command to finish and return its output, which may
    /// be empty. `None` when nothing is running.
    pub async fn next_finished(&mut self) -> Option<String> {
        let joined = tokio::select! {
            Some(joined) = self.navigation.join_next() => joined,
            Some(joined) = self.background.join_next() => joined,
            else => return None,
        };
        if self.navigation.is_empty() {
            self.resume();
        }
        Some(joined.unwrap_or_else(|err| {
            warn!(error = %err, "shell command task failed");
            String::new()
        }))
    }

    pub fn is_idle(&self) -> bool {
        self.navigation.is_empty() && self.background.is_empty() && self.deferred.is_empty()
    }

    fn resume(&mut self) {
        while self.navigation.is_empty() {
            let Some(command) = self.deferred.pop_front() else {
                break;
            };
            self.spawn(command);
        }
    }

    fn spawn(&mut self, command: ShellCommand) {
        let session = self.session.clone();
        let navigates = matches!(
            command,
            ShellCommand::Search(_)
                | ShellCommand::Page(_)
                | ShellCommand::Next
                | ShellCommand::Prev
        );
        let task = async move {
            match execute(&session, command).await {
                Flow::Continue(out) => out,
                Flow::Quit => String::new(),
            }
        };
        if navigates {
            self.navigation.spawn(task);
        } else {
            self.background.spawn(task);
        }
    }
}

fn is_local(command: &ShellCommand) -> bool {
    matches!(
        command,
        ShellCommand::Empty
            | ShellCommand::Help
            | ShellCommand::Quit
            | ShellCommand::Invalid(_)
            | ShellCommand::Dismiss(_)
    )
}

fn reads_results(command: &ShellCommand) -> bool {
    matches!(
        command,
        ShellCommand::Page(_)
            | ShellCommand::Next
            | ShellCommand::Prev
            | ShellCommand::Summarize(_)
            | ShellCommand::Related(_)
    )
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run_shell(
    session: SearchSession,
    refresh: Duration,
    initial: Option<String>,
) -> Result<()> {
    let watcher = BreakingWatch::spawn(session.clone(), refresh);
    let mut refreshes = watcher.refreshes();
    let mut watching = true;
    let mut announced = 0usize;
    let mut reading = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut jobs = Jobs::new(session.clone());

    if let Some(query) = initial {
        jobs.submit(ShellCommand::Search(query)).await;
    }
    prompt();

    while reading || !jobs.is_idle() {
        tokio::select! {
            line = lines.next_line(), if reading => {
                let command = match line.with_context(|| "Failed to read stdin")? {
                    Some(line) => parse(&line),
                    None => ShellCommand::Quit,
                };
                if command == ShellCommand::Quit {
                    reading = false;
                    continue;
                }
                if let Some(out) = jobs.submit(command).await {
                    print!("{}", out);
                    prompt();
                }
            }
            Some(out) = jobs.next_finished(), if !jobs.is_idle() => {
                if !out.is_empty() {
                    print!("{}", out);
                    if reading {
                        prompt();
                    }
                }
            }
            changed = refreshes.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                let visible = session.snapshot(|s| s.breaking().visible().len());
                if visible > 0 && visible != announced {
                    let noun = if visible == 1 { "story" } else { "stories" };
                    println!();
                    println!("[{} breaking {}: /breaking to show]", visible, noun);
                    prompt();
                }
                announced = visible;
            }
            else => break,
        }
    }

    println!();
    watcher.stop().await;
    Ok(())
}
