//! Staged and untracked file sets from `git`.

use anyhow::{bail, Context, Result};
use gripe_core::VcsIndex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

/// Version-control index backed by the `git` binary.
///
/// Outside a repository, or when `git` is missing, both sets are empty.
#[derive(Debug, Clone)]
pub struct GitIndex {
    toplevel: Option<PathBuf>,
}

impl GitIndex {
    /// Locates the repository containing `dir`.
    pub fn discover(dir: &Path) -> Self {
        let toplevel = run_git(dir, &["rev-parse", "--show-toplevel"])
            .and_then(|out| {
                let top = PathBuf::from(out.trim());
                top.canonicalize()
                    .with_context(|| format!("canonicalize {}", top.display()))
            })
            .map_err(|e| warn!("Not using git for file scope: {e:#}"))
            .ok();
        Self { toplevel }
    }

    fn list(&self, args: &[&str]) -> BTreeSet<PathBuf> {
        let Some(top) = &self.toplevel else {
            return BTreeSet::new();
        };
        match run_git(top, args) {
            Ok(out) => parse_paths(top, &out),
            Err(e) => {
                warn!("{e:#}");
                BTreeSet::new()
            }
        }
    }
}

impl VcsIndex for GitIndex {
    fn staged(&self) -> BTreeSet<PathBuf> {
        self.list(&["diff", "--cached", "--name-only", "--diff-filter=d"])
    }

    fn untracked(&self) -> BTreeSet<PathBuf> {
        self.list(&["ls-files", "--others", "--exclude-standard"])
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .with_context(|| format!("run git {}", args.join(" ")))?;

    if !output.status.success() {
        bail!(
            "git {} failed (exit={}): {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Joins repository-relative lines of git output onto `top`.
fn parse_paths(top: &Path, output: &str) -> BTreeSet<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| top.join(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_relative_lines() {
        let paths = parse_paths(Path::new("/repo"), "src/a.py\n\nREADME.md\n");
        let expected: BTreeSet<PathBuf> = ["/repo/README.md", "/repo/src/a.py"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn outside_a_repository_sets_are_empty() {
        let dir = TempDir::new().unwrap();
        let index = GitIndex {
            toplevel: None,
        };
        assert!(index.staged().is_empty());
        assert!(index.untracked().is_empty());
        // discover never fails, whatever the directory is
        let _ = GitIndex::discover(dir.path());
    }
}
