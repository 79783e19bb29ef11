// src/exec/supervisor.rs

//! Lifecycle of the single supervised child process.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{BlipError, Result};
use crate::exec::port::{resolve_port, wait_for_port_release, PORT_WAIT_TIMEOUT};
use crate::exec::shell::shell_command;
use crate::exec::signals::{self, ForwardSignal};
use crate::types::PortWait;

/// How long `stop` waits for the child to exit after the graceful signal.
pub const GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Delay between forwarding an external signal and the forced kill.
pub const SIGNAL_KILL_DELAY: Duration = Duration::from_millis(500);

/// Signal used to ask the child to shut down cleanly.
pub const GRACEFUL_SIGNAL: ForwardSignal = ForwardSignal::Interrupt;

/// State of one launched child.
///
/// The `Child` itself lives in the reaper task; the handle only keeps what
/// is needed to signal it, to ask the reaper for a kill and to learn about
/// its exit.
struct ChildHandle {
    launch_id: u64,
    pid: u32,
    pgid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
    exited: watch::Receiver<bool>,
}

impl ChildHandle {
    fn has_exited(&self) -> bool {
        *self.exited.borrow()
    }

    /// Wait up to `limit` for the reaper to report an exit.
    async fn wait_exit(&mut self, limit: Duration) -> bool {
        // An `Err` from `wait_for` means the reaper is gone, which also
        // implies the child has been waited on.
        timeout(limit, self.exited.wait_for(|done| *done))
            .await
            .is_ok()
    }

    /// SIGKILL the group, then have the reaper kill the child itself.
    /// Does not wait for the exit.
    fn force_kill(&mut self) {
        signals::kill_process_group(self.pid, self.pgid);
        if let Some(kill_tx) = self.kill_tx.take() {
            if kill_tx.send(()).is_err() {
                debug!(pid = self.pid, "reaper already finished before kill request");
            }
        }
    }
}

/// Owns at most one child process at a time.
///
/// Every operation goes through one mutex around the handle, including the
/// background reaper that clears the handle on natural exit. The reaper only
/// clears the handle if it still belongs to the launch it was spawned for.
///
/// Starting while a child is live fails with [`BlipError::AlreadyRunning`].
pub struct Supervisor {
    command: String,
    port_wait: Option<PortWait>,
    slot: Arc<Mutex<Option<ChildHandle>>>,
    next_launch: AtomicU64,
}

impl Supervisor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            port_wait: None,
            slot: Arc::new(Mutex::new(None)),
            next_launch: AtomicU64::new(1),
        }
    }

    /// Wait for a TCP port to be free before every launch.
    pub fn with_port_wait(mut self, port_wait: Option<PortWait>) -> Self {
        self.port_wait = port_wait;
        self
    }

    /// Launch the command through the platform shell.
    ///
    /// An empty command is accepted and launches nothing.
    pub async fn start(&self) -> Result<()> {
        let cmd_line = self.command.trim();
        if cmd_line.is_empty() {
            debug!("no command configured; nothing to start");
            return Ok(());
        }

        if let Some(pid) = self.live_pid().await {
            return Err(BlipError::AlreadyRunning(pid));
        }

        // Outside the lock: this can take seconds.
        if let Some(wait) = self.port_wait {
            let port = resolve_port(wait, cmd_line);
            wait_for_port_release(port, PORT_WAIT_TIMEOUT).await;
        }

        let mut slot = self.slot.lock().await;
        if let Some(handle) = slot.as_ref().filter(|h| !h.has_exited()) {
            return Err(BlipError::AlreadyRunning(handle.pid));
        }

        info!(cmd = %cmd_line, "starting");

        let child = shell_command(cmd_line)
            .spawn()
            .map_err(|source| BlipError::Launch {
                command: cmd_line.to_string(),
                source,
            })?;

        let pid = child.id().unwrap_or_default();
        let pgid = if cfg!(unix) { Some(pid) } else { None };
        let launch_id = self.next_launch.fetch_add(1, Ordering::Relaxed);

        let (kill_tx, kill_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = watch::channel(false);

        *slot = Some(ChildHandle {
            launch_id,
            pid,
            pgid,
            kill_tx: Some(kill_tx),
            exited: exit_rx,
        });
        drop(slot);

        debug!(pid, launch_id, "child started");
        tokio::spawn(reap(
            child,
            launch_id,
            Arc::clone(&self.slot),
            kill_rx,
            exit_tx,
        ));

        Ok(())
    }

    /// Stop the child: graceful signal, wait up to [`GRACE_PERIOD`], then
    /// kill the group and the child unconditionally.
    ///
    /// Idempotent. Signal and kill failures are logged and ignored.
    pub async fn stop(&self) {
        let mut slot = self.slot.lock().await;
        let Some(handle) = slot.as_mut() else {
            return;
        };

        if handle.has_exited() {
            debug!(pid = handle.pid, "child already exited");
            *slot = None;
            return;
        }

        info!(pid = handle.pid, "stopping child");

        let signaled = signals::supports_graceful_signal()
            && signals::send_signal(handle.pid, handle.pgid, GRACEFUL_SIGNAL);

        let exited = signaled && handle.wait_exit(GRACE_PERIOD).await;

        if exited {
            info!(pid = handle.pid, "child exited gracefully");
        } else {
            info!(pid = handle.pid, "forcing child termination");
            handle.force_kill();
        }

        *slot = None;
    }

    /// Forward an external signal, then force-kill the child at most
    /// [`SIGNAL_KILL_DELAY`] later whether or not it has exited.
    pub async fn signal(&self, sig: ForwardSignal) {
        let mut slot = self.slot.lock().await;
        let Some(handle) = slot.as_mut() else {
            return;
        };

        info!(pid = handle.pid, signal = %sig, "forwarding signal to child");
        signals::send_signal(handle.pid, handle.pgid, sig);

        handle.wait_exit(SIGNAL_KILL_DELAY).await;
        handle.force_kill();

        *slot = None;
    }

    /// Whether a child is currently alive.
    pub async fn is_running(&self) -> bool {
        self.live_pid().await.is_some()
    }

    /// Pid of the live child, if any.
    pub async fn live_pid(&self) -> Option<u32> {
        let slot = self.slot.lock().await;
        slot.as_ref().filter(|h| !h.has_exited()).map(|h| h.pid)
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("command", &self.command)
            .field("port_wait", &self.port_wait)
            .finish()
    }
}

/// Wait for the child, report its exit and release the handle.
///
/// A kill request (or the handle being dropped) makes the reaper kill the
/// child before waiting.
async fn reap(
    mut child: Child,
    launch_id: u64,
    slot: Arc<Mutex<Option<ChildHandle>>>,
    mut kill_rx: oneshot::Receiver<()>,
    exit_tx: watch::Sender<bool>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = &mut kill_rx => {
            if let Err(err) = child.start_kill() {
                debug!(launch_id, error = %err, "kill request failed; child may have exited");
            }
            child.wait().await
        }
    };

    match status {
        Ok(status) => info!(launch_id, exit_code = ?status.code(), "child exited"),
        Err(err) => warn!(launch_id, error = %err, "failed waiting for child"),
    }

    exit_tx.send_replace(true);

    let mut slot = slot.lock().await;
    if slot.as_ref().is_some_and(|h| h.launch_id == launch_id) {
        debug!(launch_id, "clearing handle after natural exit");
        *slot = None;
    }
}
