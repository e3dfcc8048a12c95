//! Rule flagging every `print(` call.
//!
//! # Rationale
//!
//! Print statements slow code down and clutter output. This is the simplest
//! possible rule: a pattern, a glob and the default check.

use crate::{python_globs, PRINT_PATTERN};
use gripe_core::{PatternSpec, Rule, Severity};

/// Rule name for easy-print.
pub const NAME: &str = "easy-print";

/// Flags every `print(` call in Python files.
#[derive(Debug, Clone)]
pub struct EasyPrint {
    /// Severity of the complaints.
    pub severity: Severity,
}

impl Default for EasyPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl EasyPrint {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for EasyPrint {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Print statements can slow down code."
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(PRINT_PATTERN)
    }

    fn globs(&self) -> Vec<String> {
        python_globs()
    }

    fn severity(&self) -> Severity {
        self.severity
    }
}
