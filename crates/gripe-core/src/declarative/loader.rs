//! DTO → Domain model conversion with validation.

use crate::pattern::RegexFlags;
use crate::types::Severity;

use super::config_dto::{DeclarativeConfigDto, RuleDto};
use super::model::{
    CheckStrategy, DeclarativeConfig, DeclaredRule, ModelError, RuleName, RulePattern,
};

const DEFAULT_COMMENT: &str = "#";

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "rule[0].name").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Both `pattern` and `call` are set.
    #[error("{rule_name}: at most one of `pattern` or `call` may be set")]
    AmbiguousPattern {
        /// The rule that has the conflict.
        rule_name: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: warning, critical")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown regex flag.
    #[error("{context}: {reason}")]
    InvalidFlags {
        /// Where the error occurred.
        context: String,
        /// What was wrong.
        reason: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `DeclarativeConfigDto` to a validated `DeclarativeConfig`.
///
/// Globs are not checked here; the scanner rejects empty or invalid globs
/// for every rule, declared or not.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: DeclarativeConfigDto) -> Result<DeclarativeConfig, LoadError> {
    let rules = dto
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i))
        .collect::<Result<Vec<_>, _>>()?;

    DeclarativeConfig::new(rules).map_err(LoadError::CrossRef)
}

fn convert_rule(dto: RuleDto, index: usize) -> Result<DeclaredRule, LoadError> {
    let ctx = format!("rule[{index}]");
    let name = RuleName::new(&dto.name).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.name"),
        source: e,
    })?;
    let ctx = format!("rule '{name}'");

    let comment = dto.comment.unwrap_or_else(|| DEFAULT_COMMENT.to_string());

    let pattern = match (dto.pattern, dto.call) {
        (Some(_), Some(_)) => {
            return Err(LoadError::AmbiguousPattern {
                rule_name: name.to_string(),
            })
        }
        (None, Some(call)) => RulePattern::Call {
            name: call,
            comment: Some(comment.clone()).filter(|c| !c.is_empty()),
            skip_strings: dto.skip_strings.unwrap_or(true),
        },
        (Some(source), None) if !source.is_empty() => {
            let flags = match dto.flags.as_deref() {
                Some(flags) => flags.parse::<RegexFlags>().map_err(|reason| {
                    LoadError::InvalidFlags {
                        context: format!("{ctx}.flags"),
                        reason,
                    }
                })?,
                None => RegexFlags::default(),
            };
            RulePattern::Regex { source, flags }
        }
        _ => RulePattern::Everything,
    };

    let severity = dto
        .severity
        .parse::<Severity>()
        .map_err(|_| LoadError::UnknownSeverity {
            context: ctx.clone(),
            value: dto.severity.clone(),
        })?;

    let strategy = if dto.skip_commented && !comment.is_empty() {
        CheckStrategy::SkipCommented { marker: comment }
    } else {
        CheckStrategy::Exists
    };

    Ok(DeclaredRule {
        name,
        description: dto.description.unwrap_or_default(),
        pattern,
        globs: dto.glob,
        exclude_globs: dto.exclude_glob,
        severity,
        help: dto.help,
        strategy,
    })
}
