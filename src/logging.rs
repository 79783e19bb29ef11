// src/logging.rs

//! Logging setup for `blip` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `BLIP_LOG` environment variable (e.g. "info", "debug")
//! 3. `info` with `--verbose`, `warn` otherwise
//!
//! Logs go to STDERR; the child inherits our stdout and stderr, so its own
//! output interleaves with ours on the console.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, verbose: bool) -> Result<()> {
    let level = resolve_level(
        cli_level,
        std::env::var("BLIP_LOG").ok().as_deref(),
        verbose,
    );

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the effective level from the CLI flag, the env var and `--verbose`.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    env_level: Option<&str>,
    verbose: bool,
) -> tracing::Level {
    cli_level
        .map(tracing::Level::from)
        .or_else(|| env_level.and_then(|s| s.trim().parse().ok()))
        .unwrap_or(if verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        })
}
