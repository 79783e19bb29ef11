// src/exec/signals.rs

//! Best-effort signal delivery to a child and its process group.
//!
//! Every function here swallows delivery errors after logging them at debug
//! level: a process that already exited is the common case, and shutdown
//! must keep going regardless.

use std::fmt;

use tracing::debug;

/// External signals that can be forwarded to the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl fmt::Display for ForwardSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardSignal::Interrupt => write!(f, "SIGINT"),
            ForwardSignal::Terminate => write!(f, "SIGTERM"),
            ForwardSignal::Hangup => write!(f, "SIGHUP"),
        }
    }
}

#[cfg(unix)]
mod imp {
    use nix::sys::signal::{kill, killpg, Signal};
    use nix::unistd::Pid;
    use tracing::debug;

    use super::ForwardSignal;

    fn to_nix(sig: ForwardSignal) -> Signal {
        match sig {
            ForwardSignal::Interrupt => Signal::SIGINT,
            ForwardSignal::Terminate => Signal::SIGTERM,
            ForwardSignal::Hangup => Signal::SIGHUP,
        }
    }

    /// Deliver `sig` to the process group, falling back to the pid.
    pub fn send(pid: u32, pgid: Option<u32>, sig: ForwardSignal) -> bool {
        deliver(pid, pgid, to_nix(sig))
    }

    pub fn kill_group(pid: u32, pgid: Option<u32>) {
        deliver(pid, pgid, Signal::SIGKILL);
    }

    fn deliver(pid: u32, pgid: Option<u32>, sig: Signal) -> bool {
        if let Some(pgid) = pgid {
            match killpg(Pid::from_raw(pgid as i32), sig) {
                Ok(()) => return true,
                Err(err) => {
                    debug!(pgid, signal = ?sig, error = %err, "group signal failed; trying pid");
                }
            }
        }
        match kill(Pid::from_raw(pid as i32), sig) {
            Ok(()) => true,
            Err(err) => {
                debug!(pid, signal = ?sig, error = %err, "signal delivery failed");
                false
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::ForwardSignal;

    /// No signal concept here; callers move on to a forced kill.
    pub fn send(_pid: u32, _pgid: Option<u32>, _sig: ForwardSignal) -> bool {
        false
    }

    pub fn kill_group(_pid: u32, _pgid: Option<u32>) {}
}

/// Whether a graceful signal can be delivered on this platform at all.
pub const fn supports_graceful_signal() -> bool {
    cfg!(unix)
}

/// Send `sig` to the child's process group (or the child alone).
///
/// Returns whether delivery succeeded.
pub fn send_signal(pid: u32, pgid: Option<u32>, sig: ForwardSignal) -> bool {
    let delivered = imp::send(pid, pgid, sig);
    debug!(pid, ?pgid, signal = %sig, delivered, "sent signal to child");
    delivered
}

/// SIGKILL the child's process group (or the child alone). No-op where
/// process groups and signals do not exist.
pub fn kill_process_group(pid: u32, pgid: Option<u32>) {
    imp::kill_group(pid, pgid);
}
