//! Fatal configuration errors raised before any file is scanned.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Which glob list of a rule an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobKind {
    /// The include list (`globs`).
    Include,
    /// The exclude list (`exclude_globs`).
    Exclude,
}

impl std::fmt::Display for GlobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Include => write!(f, "glob"),
            Self::Exclude => write!(f, "exclude glob"),
        }
    }
}

/// Errors that abort a run before scanning starts.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// The rule provider returned nothing.
    #[error("no rules found")]
    #[diagnostic(
        code(gripe::no_rules),
        help("enable a preset, add [[rule]] tables to gripe.toml, or pass --load-module")
    )]
    NoRules,

    /// A rule declared no include globs.
    #[error("rule `{rule}` has no globs")]
    #[diagnostic(
        code(gripe::empty_glob_set),
        help("every rule needs at least one include glob, for example \"*.py\"")
    )]
    EmptyGlobSet {
        /// Offending rule.
        rule: String,
    },

    /// A glob string was empty.
    #[error("rule `{rule}` has an empty {kind}")]
    #[diagnostic(code(gripe::empty_glob))]
    EmptyGlob {
        /// Offending rule.
        rule: String,
        /// Which list contained it.
        kind: GlobKind,
    },

    /// A glob string could not be parsed.
    #[error("rule `{rule}` has an invalid {kind} `{glob}`")]
    #[diagnostic(code(gripe::invalid_glob))]
    InvalidGlob {
        /// Offending rule.
        rule: String,
        /// Which list contained it.
        kind: GlobKind,
        /// The glob text.
        glob: String,
        /// Parser error.
        #[source]
        source: glob::PatternError,
    },

    /// A text pattern is not a valid regular expression.
    #[error("rule `{rule}` has an invalid pattern `{pattern}`")]
    #[diagnostic(code(gripe::invalid_pattern))]
    InvalidPattern {
        /// Offending rule.
        rule: String,
        /// The pattern source.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// The scan root is missing or not a directory.
    #[error("`{}` is not a directory", path.display())]
    #[diagnostic(code(gripe::bad_root), help("check --analyze-dir or [scanner].root"))]
    NotADirectory {
        /// The root that was given.
        path: PathBuf,
    },

    /// IO error while walking the tree.
    #[error("IO error: {0}")]
    #[diagnostic(code(gripe::io))]
    Io(#[from] std::io::Error),
}
