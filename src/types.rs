// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Strategy used to notice file changes.
///
/// - `Poll`: rescan the tree on a fixed interval and compare modification
///   times (default, works everywhere).
/// - `Notify`: rely on OS file notifications via `notify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    #[default]
    Poll,
    Notify,
}

impl FromStr for DetectorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poll" => Ok(DetectorBackend::Poll),
            "notify" => Ok(DetectorBackend::Notify),
            other => Err(format!(
                "invalid detector backend: {other} (expected \"poll\" or \"notify\")"
            )),
        }
    }
}

impl fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorBackend::Poll => write!(f, "poll"),
            DetectorBackend::Notify => write!(f, "notify"),
        }
    }
}

/// How long to wait for a TCP port to be released before launching.
///
/// `Auto` guesses the port from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortWait {
    Auto,
    Port(u16),
}
