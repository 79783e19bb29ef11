// src/engine/signals.rs

//! OS signal handling: turns SIGINT / SIGTERM / SIGHUP (Ctrl-C elsewhere)
//! into termination requests for the runtime.

use tokio::sync::mpsc;
use tracing::warn;

use crate::errors::Result;
use crate::exec::ForwardSignal;

/// Install the signal handlers and forward every received signal.
///
/// Installation errors are returned; they happen before the child runs.
pub fn spawn_signal_listener() -> Result<mpsc::Receiver<ForwardSignal>> {
    let (tx, rx) = mpsc::channel::<ForwardSignal>(4);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sighup = signal(SignalKind::hangup())?;

        tokio::spawn(async move {
            loop {
                let sig = tokio::select! {
                    _ = sigint.recv() => ForwardSignal::Interrupt,
                    _ = sigterm.recv() => ForwardSignal::Terminate,
                    _ = sighup.recv() => ForwardSignal::Hangup,
                };
                warn!(signal = %sig, "signal received");
                if tx.send(sig).await.is_err() {
                    break;
                }
            }
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                    return;
                }
                warn!("Ctrl+C received");
                if tx.send(ForwardSignal::Interrupt).await.is_err() {
                    break;
                }
            }
        });
    }

    Ok(rx)
}
