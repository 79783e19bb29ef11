// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_duration;
use crate::types::{DetectorBackend, PortWait};

/// Command-line arguments for `blip`.
///
/// Everything after `--` is the command to run, e.g.
/// `blip -v --ext .go,.tmpl -- go run ./cmd/server`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "blip",
    version,
    about = "Restart a command whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a TOML config file.
    ///
    /// Default: `blip.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Poll interval, e.g. `500ms`, `1s`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Comma-separated list of file extensions to watch.
    #[arg(long = "ext", value_name = "LIST")]
    pub extensions: Option<String>,

    /// Ignore .git, .hg and .svn directories.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub ignore_vcs: Option<bool>,

    /// Print restart notices.
    #[arg(short, long)]
    pub verbose: bool,

    /// Change detection strategy.
    #[arg(long, value_enum, value_name = "BACKEND")]
    pub backend: Option<DetectorBackend>,

    /// Pause between stopping the old process and starting the new one.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub restart_delay: Option<Duration>,

    /// Wait for a TCP port to be released before each launch.
    ///
    /// Without a value the port is guessed from the command line.
    #[arg(
        long,
        value_name = "PORT",
        num_args = 0..=1,
        default_missing_value = "auto",
        value_parser = parse_port_wait
    )]
    pub wait_port: Option<PortWait>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BLIP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run (default: `go run .`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn parse_port_wait(s: &str) -> Result<PortWait, String> {
    if s.trim().eq_ignore_ascii_case("auto") {
        return Ok(PortWait::Auto);
    }
    s.trim()
        .parse::<u16>()
        .map(PortWait::Port)
        .map_err(|e| format!("invalid port '{s}': {e}"))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
