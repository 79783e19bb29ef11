// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Parsing the watched extension list.
//! - Snapshotting the tree (path -> modification time) and diffing snapshots.
//! - Running the detector in the background and turning changes into
//!   coalesced restart signals.
//!
//! It does **not** know about the child process; it only says "something
//! changed".

pub mod extensions;
pub mod poller;
pub mod snapshot;
pub mod watcher;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::WatchConfig;
use crate::errors::Result;
use crate::types::DetectorBackend;

pub use extensions::{file_extension, parse_extensions, ExtensionSet};
pub use poller::{spawn_poller, ChangeDetector};
pub use snapshot::{diff, scan, WatchSnapshot};
pub use watcher::{is_watched_path, spawn_notify_watcher};

/// Create the restart signal channel.
///
/// It has a single slot: while one signal is pending, further ones are
/// dropped rather than queued.
pub fn restart_channel() -> (mpsc::Sender<()>, mpsc::Receiver<()>) {
    mpsc::channel(1)
}

/// Outcome of [`send_restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartSend {
    Sent,
    Coalesced,
    Closed,
}

/// Offer a restart signal without waiting.
pub fn send_restart(tx: &mpsc::Sender<()>) -> RestartSend {
    match tx.try_send(()) {
        Ok(()) => RestartSend::Sent,
        Err(TrySendError::Full(())) => {
            debug!("restart already pending; dropping duplicate signal");
            RestartSend::Coalesced
        }
        Err(TrySendError::Closed(())) => RestartSend::Closed,
    }
}

/// Handle for a running detector.
///
/// Dropping the handle stops change detection.
pub struct DetectorHandle {
    task: JoinHandle<()>,
    _watcher: Option<RecommendedWatcher>,
}

impl DetectorHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DetectorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for DetectorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorHandle")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

/// Start change detection for `cfg`, using `baseline` as the first snapshot
/// to compare against.
///
/// Restart signals are delivered on `restart_tx` (see [`restart_channel`]).
pub fn spawn_detector(
    cfg: &WatchConfig,
    baseline: WatchSnapshot,
    restart_tx: mpsc::Sender<()>,
) -> Result<DetectorHandle> {
    match cfg.backend {
        DetectorBackend::Poll => {
            let detector = ChangeDetector::new(
                cfg.root.clone(),
                cfg.extensions.clone(),
                cfg.ignore_vcs,
                baseline,
            );
            let task = spawn_poller(detector, cfg.interval, restart_tx);
            Ok(DetectorHandle {
                task,
                _watcher: None,
            })
        }
        DetectorBackend::Notify => {
            let root = snapshot::canonical_root(&cfg.root);
            let (watcher, task) =
                spawn_notify_watcher(root, cfg.extensions.clone(), cfg.ignore_vcs, restart_tx)?;
            Ok(DetectorHandle {
                task,
                _watcher: Some(watcher),
            })
        }
    }
}
