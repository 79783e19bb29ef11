// src/config/settings.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::duration::parse_duration;
use crate::config::model::ConfigFile;
use crate::errors::{BlipError, Result};
use crate::types::{DetectorBackend, PortWait};
use crate::watch::{parse_extensions, ExtensionSet};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_EXTENSIONS: &str = ".go,.mod,.sum,.tpl,.html,.css,.js";
pub const DEFAULT_COMMAND: &str = "go run .";
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(100);

/// Effective settings the control loop runs with.
///
/// Built once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub interval: Duration,
    pub extensions: ExtensionSet,
    pub ignore_vcs: bool,
    pub verbose: bool,
    pub command: String,
    pub backend: DetectorBackend,
    pub restart_delay: Duration,
    pub wait_port: Option<PortWait>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            interval: DEFAULT_INTERVAL,
            extensions: parse_extensions(DEFAULT_EXTENSIONS),
            ignore_vcs: true,
            verbose: false,
            command: DEFAULT_COMMAND.to_string(),
            backend: DetectorBackend::Poll,
            restart_delay: DEFAULT_RESTART_DELAY,
            wait_port: None,
        }
    }
}

impl WatchConfig {
    /// Replace a zero poll interval with the default.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };
        self
    }
}

/// Merge the config file and CLI flags into a [`WatchConfig`].
///
/// CLI flags win over the file, the file wins over the defaults.
pub fn resolve(file: &ConfigFile, cli: &CliArgs) -> Result<WatchConfig> {
    let defaults = WatchConfig::default();

    let root = cli
        .root
        .clone()
        .or_else(|| file.watch.root.as_ref().map(PathBuf::from))
        .unwrap_or(defaults.root.clone());

    let interval = match cli.interval {
        Some(d) => d,
        None => file_duration(
            "[watch].interval",
            file.watch.interval.as_deref(),
            file.watch.interval_ms,
        )?
        .unwrap_or(defaults.interval),
    };

    let extensions = cli
        .extensions
        .as_deref()
        .or(file.watch.extensions.as_deref())
        .map(parse_extensions)
        .unwrap_or(defaults.extensions.clone());

    let ignore_vcs = cli
        .ignore_vcs
        .or(file.watch.ignore_vcs)
        .unwrap_or(defaults.ignore_vcs);

    let verbose = cli.verbose || file.verbose.unwrap_or(defaults.verbose);

    let command = if !cli.command.is_empty() {
        cli.command.join(" ")
    } else {
        file.run
            .cmd
            .clone()
            .unwrap_or(defaults.command.clone())
    };

    let backend = cli
        .backend
        .or(file.watch.backend)
        .unwrap_or(defaults.backend);

    let restart_delay = match cli.restart_delay {
        Some(d) => d,
        None => file_duration(
            "[run].restart_delay",
            file.run.restart_delay.as_deref(),
            file.run.restart_delay_ms,
        )?
        .unwrap_or(defaults.restart_delay),
    };

    let wait_port = cli
        .wait_port
        .or_else(|| file.run.wait_port.and_then(|w| w.into_port_wait()));

    let cfg = WatchConfig {
        root,
        extensions,
        ignore_vcs,
        verbose,
        command,
        backend,
        restart_delay,
        wait_port,
        ..defaults
    }
    .with_interval(interval);

    Ok(cfg)
}

/// Read a duration given either as a string (`key = "2s"`) or as integer
/// milliseconds (`key_ms = 2000`).
fn file_duration(
    key: &str,
    text: Option<&str>,
    millis: Option<u64>,
) -> Result<Option<Duration>> {
    match (text, millis) {
        (Some(_), Some(_)) => Err(BlipError::Config(format!(
            "{key} and {key}_ms are both set; use one"
        ))),
        (Some(s), None) => parse_duration(s)
            .map(Some)
            .map_err(|e| BlipError::Config(format!("{key}: {e}"))),
        (None, Some(ms)) => Ok(Some(Duration::from_millis(ms))),
        (None, None) => Ok(None),
    }
}
