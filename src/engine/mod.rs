// src/engine/mod.rs

//! Orchestration engine for blip.
//!
//! The control loop owns the supervised process and reacts to:
//! - restart signals from the change detector
//! - external termination signals

pub mod runtime;
pub mod signals;

pub use runtime::{ExitReason, RunSummary, Runtime, RuntimeOptions};
pub use signals::spawn_signal_listener;
