//! Rules flagging `TODO` markers.
//!
//! Two rules with the same pattern and different file scopes: the matcher
//! runs once per file and both rules see its matches where their globs
//! overlap.

use gripe_core::{PatternSpec, Rule, Severity};

/// Pattern shared by both rules.
const TODO_PATTERN: &str = r"\bTODO\b";

/// Flags `TODO` left in source code.
#[derive(Debug, Clone)]
pub struct TodoInSource {
    /// Include globs.
    pub globs: Vec<String>,
    /// Severity of the complaints.
    pub severity: Severity,
}

impl TodoInSource {
    /// Rule name.
    pub const NAME: &'static str = "todo-in-source";

    /// Creates a new rule covering Python and Rust files.
    #[must_use]
    pub fn new() -> Self {
        Self {
            globs: vec!["*.py".to_string(), "*.rs".to_string()],
            severity: Severity::Warning,
        }
    }

    /// Replaces the include globs.
    #[must_use]
    pub fn with_globs(mut self, globs: Vec<String>) -> Self {
        self.globs = globs;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Default for TodoInSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TodoInSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "TODO left in code; open an issue instead."
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(TODO_PATTERN)
    }

    fn globs(&self) -> Vec<String> {
        self.globs.clone()
    }

    fn severity(&self) -> Severity {
        self.severity
    }
}

/// Flags `TODO` left in Markdown documents.
#[derive(Debug, Clone, Default)]
pub struct TodoInDocs;

impl TodoInDocs {
    /// Rule name.
    pub const NAME: &'static str = "todo-in-docs";

    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TodoInDocs {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Unfinished documentation."
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(TODO_PATTERN)
    }

    fn globs(&self) -> Vec<String> {
        vec!["*.md".to_string()]
    }
}
