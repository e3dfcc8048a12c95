//! Rule requiring every Python class to be mentioned in the README.
//!
//! # Rationale
//!
//! Public classes that nobody documented tend to stay undocumented. The
//! complaint points at both the class and the README section where it
//! should be listed, so it spans two files.
//!
//! # Configuration
//!
//! - `readme`: README path relative to the scan root (default: `README.md`)
//! - `anchor`: text marking the section classes are listed in
//!   (default: `# Classes`); when absent the note points at the end of the
//!   README

use crate::python_globs;
use gripe_core::{Complaint, MatchContext, PatternSpec, Rule, RuleError, Severity, Span};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Rule name for readme-reference.
pub const NAME: &str = "readme-reference";

const NAME_GROUP: &str = "name";

/// Flags classes whose name never appears as a word in the README.
#[derive(Debug, Clone)]
pub struct ReadmeReference {
    /// README path, relative to the scan root.
    pub readme: PathBuf,
    /// Section marker the note points at.
    pub anchor: String,
    /// Severity of the complaints.
    pub severity: Severity,
    loaded: Option<(PathBuf, String)>,
}

impl Default for ReadmeReference {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadmeReference {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            anchor: "# Classes".to_string(),
            severity: Severity::Warning,
            loaded: None,
        }
    }

    /// Sets the README path.
    #[must_use]
    pub fn readme(mut self, path: impl Into<PathBuf>) -> Self {
        self.readme = path.into();
        self
    }

    /// Sets the section marker.
    #[must_use]
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Reads the README once; later calls reuse the text.
    fn load(&mut self, root: &Path) -> Result<(PathBuf, &str), RuleError> {
        if self.loaded.is_none() {
            let path = root.join(&self.readme);
            let text = std::fs::read_to_string(&path).map_err(|source| RuleError::Io {
                path: path.clone(),
                source,
            })?;
            self.loaded = Some((path, text));
        }
        match &self.loaded {
            Some((path, text)) => Ok((path.clone(), text.as_str())),
            None => Err(RuleError::msg("README was not loaded")),
        }
    }
}

impl Rule for ReadmeReference {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Not found in README.md"
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(r"\bclass\s+(?P<name>[A-Za-z0-9_]+)\s*[:(]")
    }

    fn globs(&self) -> Vec<String> {
        python_globs()
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        let Some(class) = ctx.group(NAME_GROUP) else {
            return Err(RuleError::msg("class pattern matched without a name"));
        };
        let word = Regex::new(&format!(r"\b{}\b", regex::escape(class)))
            .map_err(|e| RuleError::msg(e.to_string()))?;

        let severity = self.severity;
        let anchor = self.anchor.clone();
        let readme_name = self.readme.display().to_string();
        let (readme_path, readme) = self.load(ctx.root)?;
        if word.is_match(readme) {
            return Ok(vec![]);
        }

        let target = readme.find(&anchor).map_or_else(
            || Span::empty(readme.len()),
            |start| Span::new(start, start + anchor.len()),
        );
        let description = format!("`{class}` not found in {readme_name}");
        Ok(vec![Complaint::new(NAME, severity, description)
            .with_span(ctx.path, ctx.span)
            .with_note(readme_path, target, "Add it here.")])
    }
}
