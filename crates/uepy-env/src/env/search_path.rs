//! The interpreter's module search path, exported as `PYTHONPATH`.

use std::path::{Path, PathBuf};

/// Ordered, duplicate-free list of module directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `PYTHONPATH`-style value using the platform separator.
    /// Empty segments are dropped.
    pub fn parse(value: &str) -> Self {
        let mut sp = Self::new();
        for p in std::env::split_paths(value) {
            if !p.as_os_str().is_empty() {
                sp.push_unique(p);
            }
        }
        sp
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|p| p == path)
    }

    /// Append `path` unless already present. Returns whether it was added.
    pub fn push_unique(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.entries.push(path);
        true
    }

    /// Insert `path` at the front, moving it there if already present.
    pub fn prepend(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.entries.retain(|p| p != &path);
        self.entries.insert(0, path);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render for `PYTHONPATH`. Entries that contain the separator are
    /// skipped with a warning.
    pub fn to_env_value(&self) -> String {
        let usable: Vec<&PathBuf> = self
            .entries
            .iter()
            .filter(|p| {
                let ok = std::env::join_paths([p.as_os_str()]).is_ok();
                if !ok {
                    tracing::warn!("Skipping search path entry with separator: {}", p.display());
                }
                ok
            })
            .collect();
        std::env::join_paths(usable)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_and_prepend() {
        let mut sp = SearchPath::new();
        assert!(sp.push_unique("/a"));
        assert!(sp.push_unique("/b"));
        assert!(!sp.push_unique("/a"));
        sp.prepend("/b");
        assert_eq!(sp.entries(), &[PathBuf::from("/b"), PathBuf::from("/a")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_and_render_roundtrip_unix() {
        let sp = SearchPath::parse("/a::/b:/a");
        assert_eq!(sp.entries(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(sp.to_env_value(), "/a:/b");
    }

    #[cfg(unix)]
    #[test]
    fn test_render_skips_entries_with_separator() {
        let mut sp = SearchPath::new();
        sp.push_unique("/ok");
        sp.push_unique("/bad:path");
        assert_eq!(sp.to_env_value(), "/ok");
    }
}
