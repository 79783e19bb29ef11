// src/watch/extensions.rs

use std::collections::BTreeSet;
use std::fmt;

/// Set of watched file extensions.
///
/// Every entry carries a leading `.` and matching is case-sensitive, so
/// `.CSS` and `.css` are different extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: BTreeSet<String>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extension, adding the leading `.` if it is missing.
    ///
    /// Blank input is ignored. Returns `true` if the set changed.
    pub fn insert(&mut self, ext: &str) -> bool {
        let ext = ext.trim();
        if ext.is_empty() {
            return false;
        }
        if ext.starts_with('.') {
            self.exts.insert(ext.to_string())
        } else {
            self.exts.insert(format!(".{ext}"))
        }
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.exts.contains(ext)
    }

    /// Whether the file name's extension (as returned by [`file_extension`])
    /// is in the set.
    pub fn matches_file_name(&self, name: &str) -> bool {
        file_extension(name).is_some_and(|ext| self.contains(ext))
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExtensionSet::new();
        for ext in iter {
            set.insert(ext.as_ref());
        }
        set
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Parse a comma-separated extension list such as `".go, js ,,.CSS"`.
///
/// Tokens are trimmed, empty tokens dropped, a leading `.` is prepended when
/// absent and duplicates collapse. Case is preserved.
pub fn parse_extensions(csv: &str) -> ExtensionSet {
    csv.split(',').collect()
}

/// Extension of a file name: the suffix starting at the last `.`.
///
/// Unlike [`std::path::Path::extension`], a dot-file such as `.env` has the
/// extension `.env`, and the returned value includes the dot.
pub fn file_extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}
