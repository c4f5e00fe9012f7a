//! Periodic breaking-news refresh.
//!
//! [`BreakingWatch`] spawns a task that refreshes the session's breaking
//! feed immediately and then every `refresh_secs`. A failed refresh is
//! logged and retried on the next tick; the previously visible stories
//! stay in place. The task stops on [`BreakingWatch::stop`] and is aborted
//! when the watch is dropped.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::render;
use crate::session::SearchSession;

pub struct BreakingWatch {
    shutdown_tx: watch::Sender<bool>,
    refreshes: watch::Receiver<u64>,
    handle: Option<JoinHandle<()>>,
}

impl BreakingWatch {
    /// Start refreshing `session`'s breaking feed every `every`.
    pub fn spawn(session: SearchSession, every: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let (count_tx, refreshes) = watch::channel(0u64);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match session.refresh_breaking().await {
                            Ok(visible) => debug!(visible, "breaking refresh"),
                            Err(err) => warn!(error = %err, "breaking refresh failed"),
                        }
                        count_tx.send_modify(|n| *n += 1);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!("breaking watch stopped");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            refreshes,
            handle: Some(handle),
        }
    }

    /// Receiver of the number of refresh attempts made so far.
    pub fn refreshes(&self) -> watch::Receiver<u64> {
        self.refreshes.clone()
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for BreakingWatch {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// `pulse breaking`: print the current banner, or keep refreshing it with
/// `--watch` until Ctrl-C.
pub async fn run_breaking(session: &SearchSession, refresh: Duration, watch: bool) -> Result<()> {
    if !watch {
        session
            .refresh_breaking()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
        print!("{}", render::banner(&session.banner_view(Utc::now())));
        return Ok(());
    }

    let watcher = BreakingWatch::spawn(session.clone(), refresh);
    let mut refreshes = watcher.refreshes();
    loop {
        tokio::select! {
            changed = refreshes.changed() => {
                if changed.is_err() {
                    break;
                }
                print!("{}", render::banner(&session.banner_view(Utc::now())));
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }
    watcher.stop().await;
    Ok(())
}
