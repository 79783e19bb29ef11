// src/exec/backend.rs

//! Pluggable process control abstraction.
//!
//! The control loop talks to a `ProcessControl` instead of a concrete
//! [`Supervisor`]. Production code uses the supervisor; tests can provide an
//! implementation that records calls without spawning processes.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::signals::ForwardSignal;
use crate::exec::supervisor::Supervisor;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Start / stop / signal operations the control loop needs.
pub trait ProcessControl: Send {
    fn start(&mut self) -> BoxFuture<'_, Result<()>>;

    fn stop(&mut self) -> BoxFuture<'_, ()>;

    fn signal(&mut self, sig: ForwardSignal) -> BoxFuture<'_, ()>;
}

impl ProcessControl for Supervisor {
    fn start(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(Supervisor::start(self))
    }

    fn stop(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(Supervisor::stop(self))
    }

    fn signal(&mut self, sig: ForwardSignal) -> BoxFuture<'_, ()> {
        Box::pin(Supervisor::signal(self, sig))
    }
}
