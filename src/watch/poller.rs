// src/watch/poller.rs

//! Timestamp-polling change detection.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::watch::extensions::ExtensionSet;
use crate::watch::snapshot::{diff, scan, WatchSnapshot};
use crate::watch::{send_restart, RestartSend};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Synchronous half of the poller: rescans the tree and compares it to the
/// last accepted snapshot.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    root: PathBuf,
    extensions: ExtensionSet,
    ignore_vcs: bool,
    baseline: WatchSnapshot,
}

impl ChangeDetector {
    pub fn new(
        root: impl Into<PathBuf>,
        extensions: ExtensionSet,
        ignore_vcs: bool,
        baseline: WatchSnapshot,
    ) -> Self {
        Self {
            root: root.into(),
            extensions,
            ignore_vcs,
            baseline,
        }
    }

    /// Take a fresh snapshot and compare it with the baseline.
    ///
    /// On a difference the new snapshot becomes the baseline and `true` is
    /// returned. A scan error leaves the baseline untouched.
    pub fn poll(&mut self) -> Result<bool> {
        let current = scan(&self.root, &self.extensions, self.ignore_vcs)?;
        if diff(&self.baseline, &current) {
            debug!(
                before = self.baseline.len(),
                after = current.len(),
                "snapshot differs from baseline"
            );
            self.baseline = current;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn baseline(&self) -> &WatchSnapshot {
        &self.baseline
    }
}

/// Spawn the poll loop.
///
/// Every `period` the tree is rescanned on the blocking pool. Each detected
/// change produces at most one pending restart signal on `restart_tx`. The
/// loop ends when the receiving side is dropped.
pub fn spawn_poller(
    mut detector: ChangeDetector,
    period: Duration,
    restart_tx: mpsc::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(root = ?detector.root, ?period, "polling watcher started");

        let mut ticker = interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the baseline already covers it.
        ticker.tick().await;

        // Report a failing root once, not on every tick.
        let mut root_error_reported = false;

        loop {
            ticker.tick().await;
            if restart_tx.is_closed() {
                break;
            }

            let joined = tokio::task::spawn_blocking(move || {
                let res = detector.poll();
                (detector, res)
            })
            .await;

            let (returned, res) = match joined {
                Ok(pair) => pair,
                Err(err) => {
                    warn!(error = %err, "scan task failed; stopping poller");
                    return;
                }
            };
            detector = returned;

            match res {
                Ok(changed) => {
                    if root_error_reported {
                        info!(root = ?detector.root, "watch root readable again");
                        root_error_reported = false;
                    }
                    if changed {
                        info!("change detected, signaling restart");
                        if send_restart(&restart_tx) == RestartSend::Closed {
                            break;
                        }
                    }
                }
                Err(err) => {
                    if !root_error_reported {
                        warn!(error = %err, "scan error");
                        root_error_reported = true;
                    }
                }
            }
        }

        debug!("polling watcher loop ended");
    })
}
