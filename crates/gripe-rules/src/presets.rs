//! Rule presets for common configurations.

use crate::{
    CachedPrint, ComplexPrint, EasyPrint, ReadmeReference, TodoInDocs, TodoInSource, UsePformat,
};
use gripe_core::{Config, RuleBox};
use std::str::FromStr;
use thiserror::Error;

/// Preset configurations for gripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Everyday rules for Python projects.
    Python,
    /// Every built-in rule.
    All,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Self; 2] = [Self::Python, Self::All];

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Python => python_rules(),
            Self::All => all_rules(),
        }
    }

    /// Name used in configuration and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a preset name that does not exist.
#[derive(Debug, Clone, Error)]
#[error("unknown preset `{0}` (expected one of: python, all)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "all" => Ok(Self::All),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

/// Returns the Python set of rules.
///
/// Includes:
/// - `complex-print` - uncommented `print(` calls
/// - `use-pformat` - `pprint(...)` outside tests
/// - `todo-in-source` - `TODO` markers in code
#[must_use]
pub fn python_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ComplexPrint::new()),
        Box::new(UsePformat::new()),
        Box::new(TodoInSource::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(EasyPrint::new()),
        Box::new(ComplexPrint::new()),
        Box::new(CachedPrint::new()),
        Box::new(ReadmeReference::new()),
        Box::new(UsePformat::new()),
        Box::new(TodoInSource::new()),
        Box::new(TodoInDocs::new()),
    ]
}

/// Returns the rules of `preset` with options from `[rules.<name>]`
/// tables applied.
///
/// Enable flags and severity overrides are applied later by the scanner;
/// this only covers rule-specific options.
#[must_use]
pub fn configured_rules(preset: Preset, config: &Config) -> Vec<RuleBox> {
    let names: Vec<String> = preset
        .rules()
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    names
        .iter()
        .filter_map(|name| configured_rule(name, config))
        .collect()
}

fn configured_rule(name: &str, config: &Config) -> Option<RuleBox> {
    let options = config.rule(name);
    let opt_str = |key: &str, default: &str| {
        options.map_or_else(|| default.to_string(), |o| o.get_str(key, default).to_string())
    };

    let rule: RuleBox = match name {
        crate::easy_print::NAME => Box::new(EasyPrint::new()),
        crate::complex_print::NAME => {
            Box::new(ComplexPrint::new().comment(opt_str("comment", "#")))
        }
        crate::cached_print::NAME => Box::new(CachedPrint::new()),
        crate::readme_reference::NAME => Box::new(
            ReadmeReference::new()
                .readme(opt_str("readme", "README.md"))
                .anchor(opt_str("anchor", "# Classes")),
        ),
        crate::use_pformat::NAME => {
            Box::new(UsePformat::new().comment(opt_str("comment", "#")))
        }
        TodoInSource::NAME => Box::new(TodoInSource::new()),
        TodoInDocs::NAME => Box::new(TodoInDocs::new()),
        _ => return None,
    };
    Some(rule)
}
