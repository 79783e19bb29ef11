mod common;
use crate::common::{bump_mtime, init_tracing};

use std::error::Error;
use std::fs;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{sleep, timeout};

use blip::watch::{
    parse_extensions, restart_channel, scan, send_restart, spawn_poller, ChangeDetector,
    RestartSend,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn poll_reports_each_change_once() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let app = dir.path().join("app.go");
    fs::write(&app, "package main")?;

    let exts = parse_extensions(".go");
    let baseline = scan(dir.path(), &exts, true)?;
    let mut detector = ChangeDetector::new(dir.path(), exts, true, baseline);

    assert!(!detector.poll()?, "nothing changed yet");

    bump_mtime(&app, 10)?;
    assert!(detector.poll()?, "modification");
    assert!(!detector.poll()?, "new snapshot became the baseline");

    fs::write(dir.path().join("notes.txt"), "ignored")?;
    assert!(!detector.poll()?, "unwatched extension");

    fs::write(dir.path().join("extra.go"), "package main")?;
    assert!(detector.poll()?, "addition");
    assert_eq!(detector.baseline().len(), 2);

    fs::remove_file(&app)?;
    assert!(detector.poll()?, "deletion");
    assert_eq!(detector.baseline().paths(), vec!["extra.go"]);

    Ok(())
}

#[test]
fn poll_error_keeps_baseline() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("proj");
    fs::create_dir(&root)?;
    fs::write(root.join("a.go"), "x")?;

    let exts = parse_extensions(".go");
    let baseline = scan(&root, &exts, true)?;
    let mut detector = ChangeDetector::new(&root, exts, true, baseline);

    fs::remove_dir_all(&root)?;
    assert!(detector.poll().is_err());
    assert_eq!(detector.baseline().paths(), vec!["a.go"]);

    Ok(())
}

#[tokio::test]
async fn restart_slot_holds_a_single_signal() -> TestResult {
    let (tx, mut rx) = restart_channel();

    assert_eq!(send_restart(&tx), RestartSend::Sent);
    assert_eq!(send_restart(&tx), RestartSend::Coalesced);
    assert_eq!(send_restart(&tx), RestartSend::Coalesced);

    assert_eq!(rx.try_recv(), Ok(()));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    drop(rx);
    assert_eq!(send_restart(&tx), RestartSend::Closed);

    Ok(())
}

#[tokio::test]
async fn poller_coalesces_unconsumed_changes() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let app = dir.path().join("app.go");
    fs::write(&app, "package main")?;

    let exts = parse_extensions(".go");
    let baseline = scan(dir.path(), &exts, true)?;
    let detector = ChangeDetector::new(dir.path(), exts, true, baseline);

    let (tx, mut rx) = restart_channel();
    let handle = spawn_poller(detector, Duration::from_millis(20), tx);

    // Two separate changes, several ticks apart, without consuming.
    bump_mtime(&app, 10)?;
    sleep(Duration::from_millis(200)).await;
    bump_mtime(&app, 20)?;
    sleep(Duration::from_millis(200)).await;

    assert_eq!(rx.try_recv(), Ok(()));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    // A later change still gets through.
    bump_mtime(&app, 30)?;
    timeout(Duration::from_secs(2), rx.recv())
        .await?
        .ok_or("restart channel closed")?;

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn poller_survives_missing_root() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("proj");
    fs::create_dir(&root)?;
    fs::write(root.join("a.go"), "x")?;

    let exts = parse_extensions(".go");
    let baseline = scan(&root, &exts, true)?;
    let detector = ChangeDetector::new(&root, exts, true, baseline);

    let (tx, mut rx) = restart_channel();
    let handle = spawn_poller(detector, Duration::from_millis(20), tx);

    fs::remove_dir_all(&root)?;
    sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished(), "scan errors must not stop the poller");
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    // Root comes back with a different file set.
    fs::create_dir(&root)?;
    fs::write(root.join("b.go"), "x")?;
    timeout(Duration::from_secs(2), rx.recv())
        .await?
        .ok_or("restart channel closed")?;

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn poller_stops_when_receiver_is_dropped() -> TestResult {
    let dir = tempfile::tempdir()?;
    let exts = parse_extensions(".go");
    let baseline = scan(dir.path(), &exts, true)?;
    let detector = ChangeDetector::new(dir.path(), exts, true, baseline);

    let (tx, rx) = restart_channel();
    let handle = spawn_poller(detector, Duration::from_millis(10), tx);
    drop(rx);

    timeout(Duration::from_secs(2), handle).await??;
    Ok(())
}
