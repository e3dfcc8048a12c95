//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative rules: the `[[rule]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Rule definitions.
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleDto>,
}

/// TOML representation of one rule.
///
/// ```toml
/// [[rule]]
/// name = "no-breakpoint"
/// description = "breakpoint() left in code"
/// pattern = 'breakpoint\(\)'
/// glob = ["*.py"]
/// exclude_glob = ["test_*.py"]
/// severity = "warning"
/// skip_commented = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Rule name (e.g., "no-breakpoint").
    pub name: String,
    /// Complaint description.
    #[serde(default)]
    pub description: Option<String>,
    /// Regex source (mutually exclusive with `call`).
    #[serde(default)]
    pub pattern: Option<String>,
    /// Regex flags, e.g. "ims" (default: "ms").
    #[serde(default)]
    pub flags: Option<String>,
    /// Function name for a structured call match (mutually exclusive with `pattern`).
    #[serde(default)]
    pub call: Option<String>,
    /// Line comment marker (default: "#").
    #[serde(default)]
    pub comment: Option<String>,
    /// Whether call matching skips string literals (default: true).
    #[serde(default)]
    pub skip_strings: Option<bool>,
    /// Include globs.
    #[serde(default)]
    pub glob: Vec<String>,
    /// Exclude globs.
    #[serde(default)]
    pub exclude_glob: Vec<String>,
    /// Severity (default: "critical").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Help text.
    #[serde(default)]
    pub help: Option<String>,
    /// Ignore matches preceded by the comment marker on the same line.
    #[serde(default)]
    pub skip_commented: bool,
}

fn default_severity_str() -> String {
    "critical".to_string()
}
