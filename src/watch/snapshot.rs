// src/watch/snapshot.rs

//! Filesystem snapshots and snapshot comparison.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::errors::{BlipError, Result};
use crate::watch::extensions::ExtensionSet;

/// Version-control metadata directories.
pub const VCS_DIRS: [&str; 3] = [".git", ".hg", ".svn"];

/// Modification times of every watched file under a root, keyed by
/// `/`-separated path relative to that root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSnapshot {
    files: HashMap<String, SystemTime>,
}

impl WatchSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, modified: SystemTime) {
        self.files.insert(path.into(), modified);
    }

    pub fn get(&self, path: &str) -> Option<SystemTime> {
        self.files.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.files.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl FromIterator<(String, SystemTime)> for WatchSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, SystemTime)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Walk `root` and record the modification time of every file whose
/// extension is in `extensions`.
///
/// Hidden directories (base name starting with `.`) are never entered; with
/// `ignore_vcs` set, `.git`, `.hg` and `.svn` are skipped explicitly as well.
/// Entries that cannot be read are skipped, so a file deleted mid-walk does
/// not abort the scan. The only error is an inaccessible root.
pub fn scan(root: &Path, extensions: &ExtensionSet, ignore_vcs: bool) -> Result<WatchSnapshot> {
    let meta = fs::metadata(root).map_err(|source| BlipError::Scan {
        root: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(BlipError::Scan {
            root: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let mut snapshot = WatchSnapshot::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e, ignore_vcs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                trace!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !extensions.matches_file_name(name) {
            continue;
        }

        let modified = match entry.metadata().map(|m| m.modified()) {
            Ok(Ok(t)) => t,
            _ => {
                trace!(path = ?entry.path(), "skipping file without readable mtime");
                continue;
            }
        };

        if let Some(rel) = relative_str(root, entry.path()) {
            snapshot.insert(rel, modified);
        }
    }

    Ok(snapshot)
}

/// Whether two snapshots differ: a different file count, a path in `new`
/// missing from `old`, or a shared path with a different timestamp.
///
/// The size check catches pure deletions; the membership check catches a
/// delete-plus-add that keeps the count equal.
pub fn diff(old: &WatchSnapshot, new: &WatchSnapshot) -> bool {
    if old.len() != new.len() {
        return true;
    }
    new.files.iter().any(|(path, modified)| match old.files.get(path) {
        Some(prev) => prev != modified,
        None => true,
    })
}

fn is_ignored_dir(entry: &DirEntry, ignore_vcs: bool) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if ignore_vcs && VCS_DIRS.contains(&name) {
        return true;
    }
    is_hidden_name(name)
}

/// Base names starting with `.` (but not `.` / `..` themselves).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}

/// Best-effort canonical form of the watch root.
pub fn canonical_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}
