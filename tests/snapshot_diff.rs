mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use blip::watch::{diff, WatchSnapshot};

type TestResult = Result<(), Box<dyn Error>>;

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn snapshot(entries: &[(&str, u64)]) -> WatchSnapshot {
    entries
        .iter()
        .map(|(path, secs)| (path.to_string(), at(*secs)))
        .collect()
}

#[test]
fn identical_snapshots_do_not_differ() -> TestResult {
    init_tracing();

    let a = snapshot(&[("main.go", 1), ("pkg/util.go", 2)]);
    assert!(!diff(&a, &a));
    assert!(!diff(&a, &a.clone()));
    assert!(!diff(&WatchSnapshot::new(), &WatchSnapshot::new()));

    Ok(())
}

#[test]
fn single_timestamp_change_is_symmetric() -> TestResult {
    let a = snapshot(&[("main.go", 1), ("pkg/util.go", 2)]);
    let b = snapshot(&[("main.go", 1), ("pkg/util.go", 3)]);

    assert!(diff(&a, &b));
    assert_eq!(diff(&a, &b), diff(&b, &a));

    Ok(())
}

#[test]
fn additions_and_deletions_are_detected() -> TestResult {
    let small = snapshot(&[("main.go", 1)]);
    let big = snapshot(&[("main.go", 1), ("new.go", 1)]);

    assert!(diff(&small, &big), "addition");
    assert!(diff(&big, &small), "deletion");
    assert!(diff(&WatchSnapshot::new(), &small));
    assert!(diff(&small, &WatchSnapshot::new()));

    Ok(())
}

#[test]
fn rename_with_equal_count_is_detected() -> TestResult {
    let before = snapshot(&[("a.go", 1), ("b.go", 1)]);
    let after = snapshot(&[("a.go", 1), ("c.go", 1)]);

    assert!(diff(&before, &after));
    assert!(diff(&after, &before));

    Ok(())
}

fn snapshot_strategy() -> impl Strategy<Value = WatchSnapshot> {
    proptest::collection::hash_map("[a-z]{1,6}\\.go", 0u64..1_000, 0..12).prop_map(|files| {
        files
            .into_iter()
            .map(|(path, secs)| (path, at(secs)))
            .collect::<WatchSnapshot>()
    })
}

proptest! {
    #[test]
    fn diff_against_itself_is_false(a in snapshot_strategy()) {
        prop_assert!(!diff(&a, &a));
    }

    #[test]
    fn diff_is_true_when_sizes_differ(a in snapshot_strategy(), b in snapshot_strategy()) {
        if a.len() != b.len() {
            prop_assert!(diff(&a, &b));
            prop_assert!(diff(&b, &a));
        }
    }

    #[test]
    fn diff_is_symmetric(a in snapshot_strategy(), b in snapshot_strategy()) {
        prop_assert_eq!(diff(&a, &b), diff(&b, &a));
    }
}
