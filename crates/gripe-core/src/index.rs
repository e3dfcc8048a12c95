//! Resolves rule globs against a directory tree.
//!
//! The tree is walked once. Each file is tested against every rule's
//! include and exclude globs, producing both directions of the index:
//! file → rules and rule → files.

use crate::error::{GlobKind, ScanError};
use crate::rule::{RuleBox, RuleId};
use glob::{MatchOptions, Pattern};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// How the tree is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Skip files ignored by `.gitignore` and friends.
    pub respect_gitignore: bool,
}

/// One glob, matched against a path relative to the root.
///
/// `*.py` matches `a.py` as well as `pkg/a.py`: a path matches if the glob
/// or `**/` + glob matches it.
#[derive(Debug, Clone)]
struct RecursiveGlob {
    direct: Pattern,
    nested: Option<Pattern>,
}

impl RecursiveGlob {
    fn new(glob: &str) -> Result<Self, glob::PatternError> {
        let direct = Pattern::new(glob)?;
        let nested = if glob.starts_with("**/") || glob.starts_with('/') {
            None
        } else {
            Some(Pattern::new(&format!("**/{glob}"))?)
        };
        Ok(Self { direct, nested })
    }

    fn matches(&self, relative: &str) -> bool {
        self.direct.matches_with(relative, MATCH_OPTIONS)
            || self
                .nested
                .as_ref()
                .is_some_and(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

/// Compiled include and exclude globs of one rule.
#[derive(Debug, Clone)]
pub struct RuleGlobs {
    include: Vec<RecursiveGlob>,
    exclude: Vec<RecursiveGlob>,
}

impl RuleGlobs {
    /// Compiles the globs of a rule.
    ///
    /// # Errors
    ///
    /// Fails on an empty include list, an empty glob string, or invalid
    /// glob syntax.
    pub fn compile(rule: &str, include: &[String], exclude: &[String]) -> Result<Self, ScanError> {
        if include.is_empty() {
            return Err(ScanError::EmptyGlobSet { rule: rule.into() });
        }
        Ok(Self {
            include: compile_list(rule, GlobKind::Include, include)?,
            exclude: compile_list(rule, GlobKind::Exclude, exclude)?,
        })
    }

    /// Compiles the globs a rule declares.
    ///
    /// # Errors
    ///
    /// See [`RuleGlobs::compile`].
    pub fn for_rule(rule: &RuleBox) -> Result<Self, ScanError> {
        Self::compile(rule.name(), &rule.globs(), &rule.exclude_globs())
    }

    /// True if `relative` matches an include glob and no exclude glob.
    #[must_use]
    pub fn matches(&self, relative: &str) -> bool {
        self.include.iter().any(|g| g.matches(relative))
            && !self.exclude.iter().any(|g| g.matches(relative))
    }
}

fn compile_list(
    rule: &str,
    kind: GlobKind,
    globs: &[String],
) -> Result<Vec<RecursiveGlob>, ScanError> {
    globs
        .iter()
        .map(|glob| {
            if glob.is_empty() {
                return Err(ScanError::EmptyGlob {
                    rule: rule.into(),
                    kind,
                });
            }
            RecursiveGlob::new(glob).map_err(|source| ScanError::InvalidGlob {
                rule: rule.into(),
                kind,
                glob: glob.clone(),
                source,
            })
        })
        .collect()
}

/// File → rules and rule → files, built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndex {
    root: PathBuf,
    file_to_rules: BTreeMap<PathBuf, BTreeSet<RuleId>>,
    rule_to_files: Vec<BTreeSet<PathBuf>>,
}

impl FileIndex {
    /// Walks `root` and resolves every rule's globs.
    ///
    /// Rule ids are positions in `rules`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory.
    pub fn resolve(
        rules: &[RuleGlobs],
        root: &Path,
        options: WalkOptions,
    ) -> Result<Self, ScanError> {
        let root = match std::fs::canonicalize(root) {
            Ok(root) if root.is_dir() => root,
            _ => {
                return Err(ScanError::NotADirectory {
                    path: root.to_path_buf(),
                })
            }
        };

        let mut file_to_rules: BTreeMap<PathBuf, BTreeSet<RuleId>> = BTreeMap::new();
        let mut rule_to_files = vec![BTreeSet::new(); rules.len()];

        for path in walk(&root, options) {
            let Some(relative) = relative_str(&root, &path) else {
                continue;
            };
            for (i, globs) in rules.iter().enumerate() {
                if globs.matches(&relative) {
                    file_to_rules.entry(path.clone()).or_default().insert(RuleId(i));
                    rule_to_files[i].insert(path.clone());
                }
            }
        }

        debug!(
            "Resolved {} files for {} rules under {}",
            file_to_rules.len(),
            rules.len(),
            root.display()
        );

        Ok(Self {
            root,
            file_to_rules,
            rule_to_files,
        })
    }

    /// Canonical scan root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files matched by at least one rule, in lexicographic order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.file_to_rules.keys().map(PathBuf::as_path)
    }

    /// Number of files matched by at least one rule.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_to_rules.len()
    }

    /// Rules interested in `file`.
    #[must_use]
    pub fn rules_for(&self, file: &Path) -> Option<&BTreeSet<RuleId>> {
        self.file_to_rules.get(file)
    }

    /// Files a rule resolved to.
    #[must_use]
    pub fn files_for(&self, rule: RuleId) -> Option<&BTreeSet<PathBuf>> {
        self.rule_to_files.get(rule.0)
    }

    /// True if `file` is in the resolved set of `rule`.
    #[must_use]
    pub fn contains(&self, rule: RuleId, file: &Path) -> bool {
        self.files_for(rule).is_some_and(|files| files.contains(file))
    }

    /// `file` relative to the root, or `file` itself if outside it.
    #[must_use]
    pub fn relative<'p>(&self, file: &'p Path) -> &'p Path {
        file.strip_prefix(&self.root).unwrap_or(file)
    }
}

/// Relative path with `/` separators, used for glob matching.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn is_git_dir(name: &std::ffi::OsStr) -> bool {
    name == ".git"
}

/// All regular files under `root`, sorted.
fn walk(root: &Path, options: WalkOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if options.respect_gitignore {
        let walker = ignore::WalkBuilder::new(root)
            .hidden(false)
            .require_git(false)
            .filter_entry(|e| !is_git_dir(e.file_name()))
            .build();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }
    } else {
        let walker = walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_git_dir(e.file_name()));
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }
    }

    files.sort();
    files
}
