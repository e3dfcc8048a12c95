//! Declarative rules driven by TOML configuration.
//!
//! This module is the TOML rule provider: rules are written as `[[rule]]`
//! tables instead of Rust code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! DeclarativeConfig (pure domain model)
//!   ↓ load_rules_from_toml()
//! Vec<RuleBox>
//! ```

use crate::rule::{RuleBox, RuleProvider};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod config_dto;
pub mod loader;
pub mod model;
pub mod rules;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),

    /// A rule file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Parses TOML content and creates all declared rules.
///
/// Returns `Ok(vec![])` if no `[[rule]]` tables are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleBox>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    let config = loader::load(dto)?;
    Ok(create_rules(config))
}

/// Loads rules from a TOML file, or from every `*.toml` file in a directory
/// (sorted by name).
///
/// # Errors
///
/// Returns an error if a file cannot be read or fails to load.
pub fn load_rules_from_path(path: &Path) -> Result<Vec<RuleBox>, LoadRulesError> {
    let io_err = |source| LoadRulesError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.is_dir() {
        let content = std::fs::read_to_string(path).map_err(io_err)?;
        return load_rules_from_toml(&content);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(io_err)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut rules = Vec::new();
    for file in files {
        debug!("Loading rules from {}", file.display());
        rules.extend(load_rules_from_path(&file)?);
    }
    Ok(rules)
}

/// Creates rules from a validated [`model::DeclarativeConfig`].
#[must_use]
pub fn create_rules(config: model::DeclarativeConfig) -> Vec<RuleBox> {
    config
        .into_rules()
        .into_iter()
        .map(|r| Box::new(rules::DeclarativeRule::new(r)) as RuleBox)
        .collect()
}

/// Rule provider reading `[[rule]]` tables from a file or directory.
#[derive(Debug, Clone)]
pub struct TomlRuleProvider {
    path: PathBuf,
}

impl TomlRuleProvider {
    /// Creates a provider for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RuleProvider for TomlRuleProvider {
    type Error = LoadRulesError;

    fn rules(&self) -> Result<Vec<RuleBox>, Self::Error> {
        load_rules_from_path(&self.path)
    }
}
