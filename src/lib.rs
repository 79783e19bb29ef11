// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{load_for, resolve, validate_config, WatchConfig};
use crate::engine::{spawn_signal_listener, RunSummary, Runtime, RuntimeOptions};
use crate::exec::Supervisor;
use crate::watch::{restart_channel, scan, spawn_detector};

/// Resolve the effective settings from the config file and CLI flags.
pub fn load_settings(args: &CliArgs) -> Result<WatchConfig> {
    let file = load_for(args.config.as_deref())?;
    let cfg = resolve(&file, args)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// High-level entry point used by `main.rs`.
///
/// This wires together, for already-resolved settings:
/// - the initial scan (fatal on error)
/// - the change detector
/// - the first launch (fatal on error)
/// - OS signal handling
/// - the control loop
///
/// Returns once a termination signal has been handled.
pub async fn watch_and_run(cfg: WatchConfig) -> Result<RunSummary> {
    info!(
        root = ?cfg.root,
        extensions = %cfg.extensions,
        command = %cfg.command,
        interval = ?cfg.interval,
        backend = %cfg.backend,
        "watch configuration"
    );

    // Initial scan on the blocking pool; an unreadable root is fatal here.
    let baseline = {
        let root = cfg.root.clone();
        let extensions = cfg.extensions.clone();
        let ignore_vcs = cfg.ignore_vcs;
        tokio::task::spawn_blocking(move || scan(&root, &extensions, ignore_vcs))
            .await
            .context("initial scan task failed")?
            .context("initial scan")?
    };
    info!(files = baseline.len(), "initial scan complete");

    let shutdown_rx = spawn_signal_listener().context("installing signal handlers")?;

    let (restart_tx, restart_rx) = restart_channel();
    let _detector = spawn_detector(&cfg, baseline, restart_tx).context("starting watcher")?;

    let supervisor = Supervisor::new(cfg.command.clone()).with_port_wait(cfg.wait_port);
    supervisor
        .start()
        .await
        .context("failed to start command")?;

    let options = RuntimeOptions {
        restart_delay: cfg.restart_delay,
    };

    let runtime = Runtime::new(supervisor, options, restart_rx, shutdown_rx);
    let summary = runtime.run().await?;
    Ok(summary)
}
