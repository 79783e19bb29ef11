// src/engine/runtime.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_RESTART_DELAY;
use crate::errors::Result;
use crate::exec::{ForwardSignal, ProcessControl};

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Pause between stopping the old child and starting the new one.
    pub restart_delay: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }
}

/// Why the runtime stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// An external signal asked us to terminate.
    Signal(ForwardSignal),
    /// The change detector went away.
    DetectorClosed,
}

/// What a finished runtime did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub restarts: usize,
    pub failed_restarts: usize,
    pub exit_reason: ExitReason,
}

/// Outcome of one restart cycle.
enum RestartOutcome {
    Completed { started: bool },
    Interrupted(ForwardSignal),
}

/// The control loop.
///
/// Responsibilities:
/// - Consume coalesced restart signals from the change detector and run
///   stop-then-start cycles.
/// - Consume external termination signals and shut the child down, also in
///   the middle of a restart.
///
/// The child must already have been started by the caller.
pub struct Runtime<P: ProcessControl> {
    process: P,
    options: RuntimeOptions,

    /// Restart signals from the detector (single-slot channel).
    restart_rx: mpsc::Receiver<()>,

    /// External termination requests.
    shutdown_rx: mpsc::Receiver<ForwardSignal>,
}

impl<P: ProcessControl> Runtime<P> {
    pub fn new(
        process: P,
        options: RuntimeOptions,
        restart_rx: mpsc::Receiver<()>,
        shutdown_rx: mpsc::Receiver<ForwardSignal>,
    ) -> Self {
        Self {
            process,
            options,
            restart_rx,
            shutdown_rx,
        }
    }

    /// Main event loop. Returns once the child has been shut down.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("blip runtime started");

        let mut restarts = 0;
        let mut failed_restarts = 0;

        let exit_reason = loop {
            tokio::select! {
                biased;

                Some(sig) = self.shutdown_rx.recv() => {
                    self.shutdown(sig).await;
                    break ExitReason::Signal(sig);
                }

                change = self.restart_rx.recv() => {
                    if change.is_none() {
                        warn!("change detector stopped; shutting down");
                        self.process.stop().await;
                        break ExitReason::DetectorClosed;
                    }

                    match self.restart_or_interrupt().await {
                        RestartOutcome::Completed { started } => {
                            restarts += 1;
                            if !started {
                                failed_restarts += 1;
                            }
                        }
                        RestartOutcome::Interrupted(sig) => {
                            self.shutdown(sig).await;
                            break ExitReason::Signal(sig);
                        }
                    }
                }
            }
        };

        info!(restarts, ?exit_reason, "blip runtime exiting");
        Ok(RunSummary {
            restarts,
            failed_restarts,
            exit_reason,
        })
    }

    /// Run one restart cycle, abandoning it if a termination signal arrives.
    async fn restart_or_interrupt(&mut self) -> RestartOutcome {
        let process = &mut self.process;
        let shutdown_rx = &mut self.shutdown_rx;
        let delay = self.options.restart_delay;

        tokio::select! {
            biased;

            Some(sig) = shutdown_rx.recv() => {
                debug!(signal = %sig, "termination requested mid-restart");
                RestartOutcome::Interrupted(sig)
            }

            started = restart(process, delay) => RestartOutcome::Completed { started },
        }
    }

    async fn shutdown(&mut self, sig: ForwardSignal) {
        info!(signal = %sig, "received signal, shutting down");
        self.process.signal(sig).await;
    }
}

/// Stop the child completely, pause, start it again.
///
/// A failed launch is logged; the caller keeps watching for changes.
async fn restart<P: ProcessControl>(process: &mut P, delay: Duration) -> bool {
    info!("restarting child");
    process.stop().await;

    if !delay.is_zero() {
        sleep(delay).await;
    }

    match process.start().await {
        Ok(()) => true,
        Err(err) => {
            error!(error = %err, "failed to restart command");
            false
        }
    }
}
