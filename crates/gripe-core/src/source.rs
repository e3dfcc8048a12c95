//! Where the renderer gets file text from.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplies the text of a file for rendering.
pub trait SourceProvider {
    /// Returns the text of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    fn source(&self, path: &Path) -> std::io::Result<Cow<'_, str>>;
}

/// Re-reads files from disk at render time.
///
/// Offsets may be stale if a file changed after it was scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl SourceProvider for DiskSource {
    fn source(&self, path: &Path) -> std::io::Result<Cow<'_, str>> {
        std::fs::read_to_string(path).map(Cow::Owned)
    }
}

/// Text captured while scanning, so spans always line up.
///
/// Files that were never scanned fall back to disk.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    texts: HashMap<PathBuf, String>,
}

impl SnapshotSource {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the text of a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: String) {
        self.texts.insert(path.into(), text);
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl SourceProvider for SnapshotSource {
    fn source(&self, path: &Path) -> std::io::Result<Cow<'_, str>> {
        match self.texts.get(path) {
            Some(text) => Ok(Cow::Borrowed(text)),
            None => DiskSource.source(path),
        }
    }
}
