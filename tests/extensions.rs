mod common;
use crate::common::init_tracing;

use std::error::Error;

use blip::watch::{file_extension, parse_extensions, ExtensionSet};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn parse_extensions_normalizes_tokens() -> TestResult {
    init_tracing();

    let set = parse_extensions(".go, js ,,.CSS");

    let items: Vec<&str> = set.iter().collect();
    assert_eq!(items, vec![".CSS", ".go", ".js"]);
    assert_eq!(set.len(), 3);

    Ok(())
}

#[test]
fn parse_extensions_collapses_duplicates_and_keeps_case() -> TestResult {
    let set = parse_extensions("go,.go, go ,css,.css,CSS");

    assert_eq!(set.len(), 3);
    assert!(set.contains(".go"));
    assert!(set.contains(".css"));
    assert!(set.contains(".CSS"));
    assert!(!set.contains("go"));

    Ok(())
}

#[test]
fn parse_extensions_of_blank_input_is_empty() -> TestResult {
    assert!(parse_extensions("").is_empty());
    assert!(parse_extensions(" , ,, ").is_empty());
    Ok(())
}

#[test]
fn display_joins_sorted_extensions() -> TestResult {
    let set: ExtensionSet = ["mod", ".go"].into_iter().collect();
    assert_eq!(set.to_string(), ".go,.mod");
    Ok(())
}

#[test]
fn file_extension_starts_at_last_dot() -> TestResult {
    assert_eq!(file_extension("main.go"), Some(".go"));
    assert_eq!(file_extension("archive.tar.gz"), Some(".gz"));
    assert_eq!(file_extension(".env"), Some(".env"));
    assert_eq!(file_extension("Makefile"), None);
    Ok(())
}

#[test]
fn matches_file_name_is_case_sensitive() -> TestResult {
    let set = parse_extensions(".go,.CSS");

    assert!(set.matches_file_name("main.go"));
    assert!(set.matches_file_name("site.CSS"));
    assert!(!set.matches_file_name("site.css"));
    assert!(!set.matches_file_name("main.GO"));
    assert!(!set.matches_file_name("go"));

    Ok(())
}
