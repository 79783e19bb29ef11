// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the supervised child process, using
//! `tokio::process::Command`.
//!
//! - [`supervisor`] starts, stops and signals the single child.
//! - [`shell`] builds the platform shell command.
//! - [`signals`] delivers signals to the child's process group.
//! - [`port`] waits for a server port to be released before relaunching.
//! - [`backend`] provides the `ProcessControl` trait the control loop drives,
//!   which tests can replace with a fake implementation.

pub mod backend;
pub mod port;
pub mod shell;
pub mod signals;
pub mod supervisor;

pub use backend::{BoxFuture, ProcessControl};
pub use signals::ForwardSignal;
pub use supervisor::{Supervisor, GRACEFUL_SIGNAL, GRACE_PERIOD, SIGNAL_KILL_DELAY};
