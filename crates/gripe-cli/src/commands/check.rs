//! Check command implementation.

use anyhow::{Context, Result};
use gripe_core::declarative::{self, TomlRuleProvider};
use gripe_core::{RenderOptions, RuleBox, RuleProvider, Scanner, ScopeFilter};
use gripe_rules::{configured_rules, Preset};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, LoadedConfig};
use crate::git::GitIndex;
use crate::{CheckArgs, EXIT_CONFIG_ERROR};

/// Runs the check command and returns the process exit code.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<i32> {
    let project_dir = args
        .analyze_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let loaded = config_resolver::load(&project_dir, explicit_config)?;
    let root = loaded.scan_root(args.analyze_dir.as_deref());

    let rules = collect_rules(args, &loaded)?;
    let rules = filter_rules(rules, args.rules.as_deref());

    tracing::info!("Found rules (config: {}):", loaded.describe());
    for rule in &rules {
        tracing::info!("  - {}", rule.name());
    }

    let scope = if args.staged || !args.include_untracked {
        ScopeFilter::from_vcs(
            &GitIndex::discover(&root),
            args.staged,
            args.include_untracked,
        )
    } else {
        ScopeFilter::all()
    };

    let options = RenderOptions {
        context_lines: args
            .context
            .map_or(loaded.config.scanner.context_lines, clamp_context),
        inline: args.inline || loaded.config.scanner.inline,
        ..RenderOptions::default()
    };

    let scanner = match Scanner::builder()
        .root(&root)
        .config(loaded.config)
        .rules(rules)
        .scope(scope)
        .build()
    {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    tracing::info!(
        "Scanning {} with {} rules",
        scanner.root().display(),
        scanner.rule_names().len()
    );

    let output = scanner.run();
    let options = RenderOptions {
        root: Some(output.root.clone()),
        ..options
    };
    super::output::print(&output, options, args.format)?;

    Ok(output.collector.exit_code())
}

/// Built-in preset rules, then `[[rule]]` tables from the config file, then
/// rules from `--load-module`.
///
/// The `python` preset is used only when none of those sources is set up.
/// A source that is set up but yields nothing stays empty, and the scanner
/// rejects the run.
fn collect_rules(args: &CheckArgs, loaded: &LoadedConfig) -> Result<Vec<RuleBox>> {
    let config = &loaded.config;
    let mut rules = Vec::new();

    let preset = args.preset.as_deref().or(config.preset.as_deref());
    if let Some(name) = preset {
        let preset: Preset = name.parse()?;
        rules.extend(configured_rules(preset, config));
    }

    let mut declared_any = false;
    if let Some(path) = &loaded.file {
        let declared = declarative::load_rules_from_path(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
        declared_any = !declared.is_empty();
        rules.extend(declared);
    }

    if let Some(path) = &args.load_module {
        let provided = TomlRuleProvider::new(path)
            .rules()
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
        if provided.is_empty() {
            tracing::warn!("No rules found in {}", path.display());
        }
        rules.extend(provided);
    }

    if preset.is_none() && !declared_any && args.load_module.is_none() {
        tracing::info!("No rules configured, using the `python` preset");
        rules = configured_rules(Preset::Python, config);
    }

    Ok(rules)
}

fn filter_rules(rules: Vec<RuleBox>, filter: Option<&str>) -> Vec<RuleBox> {
    let Some(filter) = filter else {
        return rules;
    };
    let wanted: HashSet<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for name in &wanted {
        if !rules.iter().any(|r| r.name() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| wanted.contains(r.name()))
        .collect()
}

/// Negative context counts mean no context.
fn clamp_context(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}
