// src/watch/watcher.rs

//! Event-driven alternative to the poller, built on `notify`.

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::Result;
use crate::watch::extensions::ExtensionSet;
use crate::watch::snapshot::{is_hidden_name, relative_str, VCS_DIRS};
use crate::watch::{send_restart, RestartSend};

/// Spawn a `notify` watcher on `root` that emits coalesced restart signals
/// for events on watched files.
///
/// The returned watcher must be kept alive; dropping it stops file watching.
pub fn spawn_notify_watcher(
    root: PathBuf,
    extensions: ExtensionSet,
    ignore_vcs: bool,
    restart_tx: mpsc::Sender<()>,
) -> Result<(RecommendedWatcher, JoinHandle<()>)> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // The forwarder task is gone; nothing left to notify.
                    eprintln!("blip: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("blip: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    let task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }

            let relevant = event
                .paths
                .iter()
                .any(|path| is_watched_path(&root, path, &extensions, ignore_vcs));
            if !relevant {
                continue;
            }

            debug!(paths = ?event.paths, "watched file event");
            if send_restart(&restart_tx) == RestartSend::Closed {
                break;
            }
        }

        debug!("file watcher loop ended");
    });

    Ok((watcher, task))
}

/// Apply the same filter the poller's scan applies to a single changed path.
pub fn is_watched_path(
    root: &Path,
    path: &Path,
    extensions: &ExtensionSet,
    ignore_vcs: bool,
) -> bool {
    let Some(rel) = relative_str(root, path) else {
        return false;
    };

    let mut components: Vec<&str> = rel.split('/').filter(|c| !c.is_empty()).collect();
    let Some(file_name) = components.pop() else {
        return false;
    };

    let in_ignored_dir = components
        .iter()
        .any(|dir| is_hidden_name(dir) || (ignore_vcs && VCS_DIRS.contains(dir)));

    !in_ignored_dir && extensions.matches_file_name(file_name)
}
