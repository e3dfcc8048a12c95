//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r##"# gripe configuration

# Built-in rules: "python" or "all" (see `gripe list-rules`)
preset = "python"

[scanner]
# Directory to scan (default: current directory)
# root = "."

# Lines of source shown before and after each span
context_lines = 1

# One line per complaint, without source context
inline = false

# Skip files ignored by .gitignore
respect_gitignore = true

# Built-in rules can be disabled, have their severity overridden, or take
# rule-specific options

[rules.complex-print]
enabled = true
# severity = "critical"

# [rules.readme-reference]
# readme = "README.md"
# anchor = "# Classes"

# Project rules

[[rule]]
name = "no-breakpoint"
description = "breakpoint() left in code"
pattern = 'breakpoint\(\)'
glob = ["*.py"]
severity = "critical"
skip_commented = true
"##;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", config_path.display());
    println!("  2. Run: gripe check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripe_core::{declarative, Config};

    #[test]
    fn default_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("python"));
        assert!(config.scanner.respect_gitignore);

        let rules = declarative::load_rules_from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "no-breakpoint");
    }
}
