//! Rule flagging `pprint(...)` calls outside of tests.
//!
//! # Rationale
//!
//! `pprint` writes straight to stdout. Formatting with `pformat` and
//! handing the result to a logger keeps output under control.
//!
//! The pattern is a structured call matcher rather than a regex: the span
//! covers the whole call including nested parentheses across lines, and
//! calls inside comments or string literals are not matches at all.
//!
//! # Configuration
//!
//! - `comment`: line comment prefix ignored by the matcher (default: `#`)

use crate::python_globs;
use gripe_core::pattern::CallMatcher;
use gripe_core::{PatternSpec, Rule, Severity};

/// Rule name for use-pformat.
pub const NAME: &str = "use-pformat";

/// Flags `pprint(...)` calls in Python files other than `test_*.py`.
#[derive(Debug, Clone)]
pub struct UsePformat {
    /// Line comment prefix.
    pub comment: String,
    /// Severity of the complaints.
    pub severity: Severity,
}

impl Default for UsePformat {
    fn default() -> Self {
        Self::new()
    }
}

impl UsePformat {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            comment: "#".to_string(),
            severity: Severity::Warning,
        }
    }

    /// Sets the line comment prefix.
    #[must_use]
    pub fn comment(mut self, prefix: impl Into<String>) -> Self {
        self.comment = prefix.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for UsePformat {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Use pformat and log instead of pprint."
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::structured(
            CallMatcher::new("pprint").comment_prefix(Some(self.comment.clone())),
        )
    }

    fn globs(&self) -> Vec<String> {
        python_globs()
    }

    fn exclude_globs(&self) -> Vec<String> {
        vec!["test_*.py".to_string()]
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn help(&self) -> Option<String> {
        Some("from pprint import pformat; logger.debug(pformat(value))".to_string())
    }
}
