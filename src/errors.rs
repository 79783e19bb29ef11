// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlipError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot scan watch root {root:?}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch command `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process already running (pid {0})")]
    AlreadyRunning(u32),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    Notify(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, BlipError>;
