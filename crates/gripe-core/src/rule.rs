//! Rule trait for defining scanner rules.

use crate::pattern::PatternSpec;
use crate::types::{Complaint, Payload, Severity, Span};
use crate::utils::text;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Description used when a rule supplies none.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// A rule: a pattern, a file scope and a check that turns matches into
/// complaints.
///
/// A rule instance lives for the whole run. Every `check` call happens
/// before the single `finalize` call, so a rule may collect state in its
/// own fields and report it at the end.
///
/// # Example
///
/// ```
/// use gripe_core::{PatternSpec, Rule};
///
/// struct NoFixme;
///
/// impl Rule for NoFixme {
///     fn name(&self) -> &str { "no-fixme" }
///     fn description(&self) -> &str { "FIXME left in source" }
///     fn pattern(&self) -> PatternSpec { PatternSpec::text("FIXME") }
///     fn globs(&self) -> Vec<String> { vec!["*.rs".into()] }
/// }
/// ```
pub trait Rule: Send {
    /// Returns the kebab-case name of this rule (e.g., "easy-print").
    fn name(&self) -> &str;

    /// Returns a brief description, used as the default complaint text.
    fn description(&self) -> &str {
        ""
    }

    /// What this rule searches for.
    fn pattern(&self) -> PatternSpec;

    /// Include globs. Must not be empty.
    fn globs(&self) -> Vec<String>;

    /// Exclude globs, subtracted from the include set.
    fn exclude_globs(&self) -> Vec<String> {
        vec![]
    }

    /// Severity of complaints from the default check.
    fn severity(&self) -> Severity {
        Severity::Critical
    }

    /// Help text attached to complaints from the default check.
    fn help(&self) -> Option<String> {
        None
    }

    /// Checks one match.
    ///
    /// The default emits a single complaint on the match span.
    ///
    /// # Errors
    ///
    /// A returned error is reported as a complaint against this rule; the
    /// scan continues.
    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        Ok(vec![exists_complaint(self, ctx)])
    }

    /// Runs once after every file has been scanned.
    ///
    /// # Errors
    ///
    /// Same isolation as [`Rule::check`].
    fn finalize(&mut self) -> Result<Vec<Complaint>, RuleError> {
        Ok(vec![])
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Builds the complaint the default check emits for a match.
#[must_use]
pub fn exists_complaint<R: Rule + ?Sized>(rule: &R, ctx: &MatchContext<'_>) -> Complaint {
    let description = match rule.description() {
        "" => DEFAULT_DESCRIPTION,
        d => d,
    };
    Complaint::new(rule.name(), rule.severity(), description)
        .with_span(ctx.path, ctx.span)
        .with_optional_help(rule.help())
}

/// Index of a rule in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub usize);

/// Error returned from a rule's check or finalize.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Free-form failure.
    #[error("{0}")]
    Failed(String),

    /// A file the rule needed could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl RuleError {
    /// Creates a free-form error.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Everything a rule sees about one match.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Full text of the file.
    pub text: &'a str,
    /// Absolute path of the file.
    pub path: &'a Path,
    /// Path relative to the scan root.
    pub relative_path: &'a Path,
    /// Scan root.
    pub root: &'a Path,
    /// The match.
    pub span: Span,
    /// Extra data from the matcher, if any.
    pub payload: Option<&'a Payload>,
}

impl<'a> MatchContext<'a> {
    /// The matched text. Empty if the span does not fit the text.
    #[must_use]
    pub fn matched(&self) -> &'a str {
        self.span.slice(self.text).unwrap_or_default()
    }

    /// Text from the start of the match's line up to the match.
    #[must_use]
    pub fn line_prefix(&self) -> &'a str {
        let start = text::floor_boundary(self.text, self.span.start);
        let line_start = self.text[..start].rfind('\n').map_or(0, |i| i + 1);
        &self.text[line_start..start]
    }

    /// Text of the named payload group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&'a str> {
        self.payload.and_then(|p| p.text(name, self.text))
    }

    /// Lines touched by the match and their 0-based numbers.
    #[must_use]
    pub fn lines_and_numbers(&self) -> (Vec<&'a str>, Vec<usize>) {
        text::lines_and_numbers(self.text, self.span)
    }
}

/// Supplies an ordered list of rules.
pub trait RuleProvider {
    /// Error raised while loading.
    type Error;

    /// Returns the rules in registration order.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn rules(&self) -> Result<Vec<RuleBox>, Self::Error>;
}
