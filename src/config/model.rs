// src/config/model.rs

use serde::Deserialize;

use crate::types::{DetectorBackend, PortWait};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// verbose = true
///
/// [watch]
/// root = "."
/// interval_ms = 500
/// extensions = ".go,.mod,.sum"
/// ignore_vcs = true
/// backend = "poll"
///
/// [run]
/// cmd = "go run ./cmd/server"
/// restart_delay_ms = 100
/// wait_port = 8080
/// ```
///
/// Durations can also be written as strings (`interval = "500ms"`,
/// `restart_delay = "1s"`); giving both forms of one setting is an error.
///
/// All sections are optional; anything left out falls back to the CLI flags
/// and then to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub verbose: Option<bool>,

    /// `[watch]` section.
    #[serde(default)]
    pub watch: WatchSection,

    /// `[run]` section.
    #[serde(default)]
    pub run: RunSection,
}

/// `[watch]` section: what to watch and how.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Directory to watch, relative to the current working directory.
    #[serde(default)]
    pub root: Option<String>,

    /// Poll interval, e.g. `"250ms"`.
    #[serde(default)]
    pub interval: Option<String>,

    /// Poll interval in milliseconds.
    #[serde(default)]
    pub interval_ms: Option<u64>,

    /// Comma-separated extension list, e.g. `".go, .html"`.
    #[serde(default)]
    pub extensions: Option<String>,

    /// Skip `.git`, `.hg` and `.svn`.
    #[serde(default)]
    pub ignore_vcs: Option<bool>,

    #[serde(default)]
    pub backend: Option<DetectorBackend>,
}

/// `[run]` section: the supervised command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSection {
    /// Shell command line to run.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Pause between stopping the old child and starting the new one.
    #[serde(default)]
    pub restart_delay: Option<String>,

    #[serde(default)]
    pub restart_delay_ms: Option<u64>,

    /// `true` to guess the port from `cmd`, or an explicit port number.
    #[serde(default)]
    pub wait_port: Option<PortWaitSetting>,
}

/// Raw `wait_port` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortWaitSetting {
    Enabled(bool),
    Port(u16),
}

impl PortWaitSetting {
    pub fn into_port_wait(self) -> Option<PortWait> {
        match self {
            PortWaitSetting::Enabled(true) => Some(PortWait::Auto),
            PortWaitSetting::Enabled(false) => None,
            PortWaitSetting::Port(port) => Some(PortWait::Port(port)),
        }
    }
}
