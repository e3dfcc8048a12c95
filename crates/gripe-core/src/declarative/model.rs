//! Pure domain model for declarative rules.
//!
//! No serde and no I/O here. Invariants are enforced at construction time.

use crate::pattern::RegexFlags;
use crate::types::Severity;
use std::collections::HashSet;
use std::fmt;

/// A validated rule name (non-empty, `[a-z0-9_-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new rule name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyRuleName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ModelError::InvalidRuleName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a declared rule searches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePattern {
    /// The whole file, once.
    Everything,
    /// A regular expression.
    Regex {
        /// Regex source.
        source: String,
        /// Flags.
        flags: RegexFlags,
    },
    /// A function call with balanced parentheses.
    Call {
        /// Function name.
        name: String,
        /// Line comment marker to skip, if any.
        comment: Option<String>,
        /// Whether string literals are skipped.
        skip_strings: bool,
    },
}

/// How a declared rule turns a match into complaints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStrategy {
    /// Every match is a complaint.
    Exists,
    /// Matches preceded by `marker` on the same line are ignored.
    SkipCommented {
        /// Comment marker.
        marker: String,
    },
}

/// A validated declarative rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredRule {
    /// Rule name.
    pub name: RuleName,
    /// Complaint description.
    pub description: String,
    /// Search pattern.
    pub pattern: RulePattern,
    /// Include globs.
    pub globs: Vec<String>,
    /// Exclude globs.
    pub exclude_globs: Vec<String>,
    /// Complaint severity.
    pub severity: Severity,
    /// Help text.
    pub help: Option<String>,
    /// Check strategy.
    pub strategy: CheckStrategy,
}

/// Aggregate root: all declared rules, names unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarativeConfig {
    rules: Vec<DeclaredRule>,
}

impl DeclarativeConfig {
    /// Creates the aggregate, checking that rule names are unique.
    ///
    /// # Errors
    ///
    /// Returns every duplicate name found.
    pub fn new(rules: Vec<DeclaredRule>) -> Result<Self, Vec<ModelError>> {
        let mut seen = HashSet::new();
        let errors: Vec<ModelError> = rules
            .iter()
            .filter(|r| !seen.insert(r.name.clone()))
            .map(|r| ModelError::DuplicateRule {
                name: r.name.to_string(),
            })
            .collect();
        if errors.is_empty() {
            Ok(Self { rules })
        } else {
            Err(errors)
        }
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[DeclaredRule] {
        &self.rules
    }

    /// Consumes the aggregate.
    #[must_use]
    pub fn into_rules(self) -> Vec<DeclaredRule> {
        self.rules
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rule name is empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,

    /// Rule name has characters outside `[a-z0-9_-]`.
    #[error("invalid rule name `{name}`: use lowercase letters, digits, '-' and '_'")]
    InvalidRuleName {
        /// The name given.
        name: String,
    },

    /// Two rules share a name.
    #[error("duplicate rule name `{name}`")]
    DuplicateRule {
        /// The repeated name.
        name: String,
    },
}
