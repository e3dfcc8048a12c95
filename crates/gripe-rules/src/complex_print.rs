//! Rule flagging `print(` calls that are not commented out.
//!
//! # Rationale
//!
//! Same concern as `easy-print`, but a `print(` preceded by the comment
//! marker on its own line is left alone.
//!
//! # Configuration
//!
//! - `comment`: comment marker (default: `#`)

use crate::{python_globs, PRINT_PATTERN};
use gripe_core::{
    exists_complaint, Complaint, MatchContext, PatternSpec, Rule, RuleError, Severity,
};

/// Rule name for complex-print.
pub const NAME: &str = "complex-print";

/// Flags `print(` calls unless the line is commented out before the call.
#[derive(Debug, Clone)]
pub struct ComplexPrint {
    /// Comment marker.
    pub comment: String,
    /// Severity of the complaints.
    pub severity: Severity,
}

impl Default for ComplexPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexPrint {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            comment: "#".to_string(),
            severity: Severity::Warning,
        }
    }

    /// Sets the comment marker.
    #[must_use]
    pub fn comment(mut self, marker: impl Into<String>) -> Self {
        self.comment = marker.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ComplexPrint {
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

    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        if ctx.line_prefix().contains(self.comment.as_str()) {
            return Ok(vec![]);
        }
        Ok(vec![exists_complaint(self, ctx)])
    }
}
