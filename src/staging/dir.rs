//! Directory View
//!
//! Lists only stable entries of a directory shared with writers and readers.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

use crate::error::{AcidError, Result};

use super::is_staged_name;

/// Filtered view over one directory
///
/// Entries are returned in filesystem order; nothing is sorted.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    dir: PathBuf,
}

impl DirectoryView {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stable entries whose file name matches the glob `pattern`
    ///
    /// Shell rules for hidden files: a name starting with `.` only matches
    /// a pattern that itself starts with `.`, so `*` skips dotfiles.
    pub fn list(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = compile(pattern)?;
        let want_hidden = pattern.starts_with('.');
        self.scan(|name| {
            !is_staged_name(name.as_os_str())
                && (want_hidden || !is_hidden(name))
                && matcher.is_match(name)
        })
    }

    /// Every stable entry
    pub fn list_all(&self) -> Result<Vec<PathBuf>> {
        self.list("*")
    }

    /// Every staged entry, whichever process owns it
    pub fn staged(&self) -> Result<Vec<PathBuf>> {
        self.scan(|name| is_staged_name(name.as_os_str()))
    }

    /// Remove every staged entry, returning how many were removed
    ///
    /// Meant for recovery after a crash. Running it while a writer or
    /// reader is active destroys that in-flight file.
    ///
    /// Every entry is attempted; if any removal failed, the first error is
    /// returned after the sweep.
    pub fn cleanup(&self) -> Result<usize> {
        let mut removed = 0;
        let mut first_err = None;
        for path in self.staged()? {
            match fs::remove_file(&path) {
                Ok(()) => {
                    removed += 1;
                    debug!(path = %path.display(), "Removed orphaned staging file");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove staging file");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(removed),
        }
    }

    fn scan(&self, mut keep: impl FnMut(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = PathBuf::from(entry.file_name());
            if keep(&name) {
                entries.push(entry.path());
            }
        }
        Ok(entries)
    }
}

fn is_hidden(name: &Path) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| AcidError::Pattern(format!("'{}': {}", pattern, e)))
}
