#![cfg(unix)]

mod common;
use crate::common::{bump_mtime, init_tracing, line_count, wait_until};

use std::error::Error;
use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use blip::config::WatchConfig;
use blip::engine::{ExitReason, Runtime, RuntimeOptions};
use blip::exec::{ForwardSignal, Supervisor};
use blip::watch::{parse_extensions, restart_channel, scan, spawn_detector};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn modified_file_relaunches_command() -> TestResult {
    init_tracing();

    let project = tempfile::tempdir()?;
    let app = project.path().join("app.go");
    fs::write(&app, "package main")?;

    let out_dir = tempfile::tempdir()?;
    let counter = out_dir.path().join("counter.txt");

    let cfg = WatchConfig {
        root: project.path().to_path_buf(),
        extensions: parse_extensions(".go"),
        command: format!("echo run >> '{}'", counter.display()),
        restart_delay: Duration::ZERO,
        ..WatchConfig::default()
    }
    .with_interval(Duration::from_millis(50));

    let baseline = scan(&cfg.root, &cfg.extensions, cfg.ignore_vcs)?;
    let (restart_tx, restart_rx) = restart_channel();
    let _detector = spawn_detector(&cfg, baseline, restart_tx)?;

    let supervisor = Supervisor::new(cfg.command.clone());
    supervisor.start().await?;
    assert!(
        wait_until(Duration::from_secs(3), || line_count(&counter) == 1).await,
        "initial launch never wrote the counter"
    );

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let options = RuntimeOptions {
        restart_delay: cfg.restart_delay,
    };
    let handle = tokio::spawn(Runtime::new(supervisor, options, restart_rx, shutdown_rx).run());

    bump_mtime(&app, 10)?;
    assert!(
        wait_until(Duration::from_secs(3), || line_count(&counter) >= 2).await,
        "change did not trigger a relaunch"
    );

    shutdown_tx.send(ForwardSignal::Terminate).await?;
    let summary = timeout(Duration::from_secs(5), handle).await???;

    assert!(summary.restarts >= 1);
    assert_eq!(summary.failed_restarts, 0);
    assert_eq!(summary.exit_reason, ExitReason::Signal(ForwardSignal::Terminate));

    Ok(())
}

#[tokio::test]
async fn restart_replaces_long_running_child() -> TestResult {
    init_tracing();

    let project = tempfile::tempdir()?;
    let app = project.path().join("main.go");
    fs::write(&app, "package main")?;

    let out_dir = tempfile::tempdir()?;
    let starts = out_dir.path().join("starts.txt");

    let cfg = WatchConfig {
        root: project.path().to_path_buf(),
        extensions: parse_extensions(".go"),
        command: format!("echo $$ >> '{}'; exec sleep 30", starts.display()),
        restart_delay: Duration::ZERO,
        ..WatchConfig::default()
    }
    .with_interval(Duration::from_millis(50));

    let baseline = scan(&cfg.root, &cfg.extensions, cfg.ignore_vcs)?;
    let (restart_tx, restart_rx) = restart_channel();
    let _detector = spawn_detector(&cfg, baseline, restart_tx)?;

    let supervisor = Supervisor::new(cfg.command.clone());
    supervisor.start().await?;
    assert!(wait_until(Duration::from_secs(3), || line_count(&starts) == 1).await);

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let handle = tokio::spawn(
        Runtime::new(supervisor, RuntimeOptions::default(), restart_rx, shutdown_rx).run(),
    );

    fs::write(project.path().join("extra.go"), "package main")?;
    assert!(
        wait_until(Duration::from_secs(5), || line_count(&starts) == 2).await,
        "second instance never started"
    );

    let pids: Vec<i32> = fs::read_to_string(&starts)?
        .lines()
        .map(|l| l.trim().parse())
        .collect::<Result<_, _>>()?;
    assert_ne!(pids[0], pids[1]);
    assert!(
        wait_until(Duration::from_secs(2), || {
            nix::sys::signal::kill(nix::unistd::Pid::from_raw(pids[0]), None).is_err()
        })
        .await,
        "first instance was not stopped before the relaunch"
    );

    shutdown_tx.send(ForwardSignal::Interrupt).await?;
    timeout(Duration::from_secs(5), handle).await???;

    assert!(
        wait_until(Duration::from_secs(2), || {
            nix::sys::signal::kill(nix::unistd::Pid::from_raw(pids[1]), None).is_err()
        })
        .await,
        "second instance outlived shutdown"
    );

    Ok(())
}
