//! Restricts a scan to files selected by version control.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File sets supplied by a version-control system.
///
/// Paths are absolute.
pub trait VcsIndex {
    /// Files staged for commit.
    fn staged(&self) -> BTreeSet<PathBuf>;

    /// Files not tracked by version control.
    fn untracked(&self) -> BTreeSet<PathBuf>;
}

/// Decides which resolved files are actually scanned.
///
/// The default filter allows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    staged: Option<BTreeSet<PathBuf>>,
    untracked: BTreeSet<PathBuf>,
    include_untracked: bool,
}

impl ScopeFilter {
    /// A filter that allows every file.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from a version-control index.
    ///
    /// With `staged_only`, only staged files pass. Untracked files are
    /// dropped unless `include_untracked` is set.
    #[must_use]
    pub fn from_vcs(vcs: &dyn VcsIndex, staged_only: bool, include_untracked: bool) -> Self {
        Self {
            staged: staged_only.then(|| vcs.staged()),
            untracked: if include_untracked {
                BTreeSet::new()
            } else {
                vcs.untracked()
            },
            include_untracked,
        }
    }

    /// True if `file` should be scanned.
    #[must_use]
    pub fn allows(&self, file: &Path) -> bool {
        let staged = self.staged.as_ref().map_or(true, |s| s.contains(file));
        staged && (self.include_untracked || !self.untracked.contains(file))
    }
}
