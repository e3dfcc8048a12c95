//! The scanner: matches each file once per distinct pattern and routes
//! every match to the rules that asked for it.

use crate::collector::Collector;
use crate::config::Config;
use crate::error::ScanError;
use crate::index::{FileIndex, RuleGlobs, WalkOptions};
use crate::pattern::{PatternCache, PatternId};
use crate::rule::{MatchContext, Rule, RuleBox, RuleError, RuleId};
use crate::scope::ScopeFilter;
use crate::source::SnapshotSource;
use crate::types::{Complaint, Severity, Span};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builder for configuring a [`Scanner`].
#[derive(Default)]
pub struct ScannerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    config: Option<Config>,
    scope: ScopeFilter,
    respect_gitignore: Option<bool>,
    snapshot: Option<bool>,
}

impl ScannerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory to scan.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Restricts which resolved files are scanned.
    #[must_use]
    pub fn scope(mut self, scope: ScopeFilter) -> Self {
        self.scope = scope;
        self
    }

    /// Overrides `scanner.respect_gitignore` from the config.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = Some(respect);
        self
    }

    /// Overrides `scanner.snapshot_sources` from the config.
    #[must_use]
    pub fn snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Validates the rules, compiles patterns and resolves globs.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no enabled rules, a glob or pattern is
    /// invalid, or the root is not a directory. No file is read before the
    /// rules have been validated.
    pub fn build(self) -> Result<Scanner, ScanError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.scanner.root.clone());

        let rules: Vec<RuleBox> = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        if rules.is_empty() {
            return Err(ScanError::NoRules);
        }

        let globs = rules
            .iter()
            .map(RuleGlobs::for_rule)
            .collect::<Result<Vec<_>, _>>()?;

        let mut patterns = PatternCache::new();
        let mut by_pattern: Vec<(PatternId, Vec<RuleId>)> = Vec::new();
        for (i, rule) in rules.iter().enumerate() {
            let spec = rule.pattern();
            let id = patterns
                .normalize(&spec)
                .map_err(|source| ScanError::InvalidPattern {
                    rule: rule.name().to_string(),
                    pattern: spec.key().to_string(),
                    source,
                })?;
            debug!("Registered rule {} with pattern {}", rule.name(), spec.key());
            match by_pattern.iter_mut().find(|(p, _)| *p == id) {
                Some((_, ids)) => ids.push(RuleId(i)),
                None => by_pattern.push((id, vec![RuleId(i)])),
            }
        }

        let overrides = rules
            .iter()
            .map(|rule| config.rule_severity(rule.name()))
            .collect();

        let walk = WalkOptions {
            respect_gitignore: self
                .respect_gitignore
                .unwrap_or(config.scanner.respect_gitignore),
        };
        let index = FileIndex::resolve(&globs, &root, walk)?;

        Ok(Scanner {
            rules,
            overrides,
            patterns,
            by_pattern,
            index,
            scope: self.scope,
            snapshot: self.snapshot.unwrap_or(config.scanner.snapshot_sources),
        })
    }
}

/// Counters collected during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files read and matched.
    pub files_scanned: usize,
    /// Files that could not be read as UTF-8 text.
    pub files_skipped: usize,
    /// Files left out by the scope filter.
    pub files_filtered: usize,
    /// Matcher invocations (one per distinct pattern per file).
    pub matcher_runs: usize,
    /// Calls to `Rule::check`.
    pub checks: usize,
}

/// Everything a finished scan produced.
#[derive(Debug)]
pub struct ScanOutput {
    /// Complaints and counters.
    pub collector: Collector,
    /// Scan statistics.
    pub stats: ScanStats,
    /// Text of the scanned files, for rendering.
    pub sources: SnapshotSource,
    /// Canonical scan root.
    pub root: PathBuf,
}

/// A ready-to-run scan.
///
/// Use [`Scanner::builder()`] to construct an instance. Running consumes
/// the scanner, so every rule is finalized exactly once.
pub struct Scanner {
    rules: Vec<RuleBox>,
    overrides: Vec<Option<Severity>>,
    patterns: PatternCache,
    by_pattern: Vec<(PatternId, Vec<RuleId>)>,
    index: FileIndex,
    scope: ScopeFilter,
    snapshot: bool,
}

impl Scanner {
    /// Creates a new builder for configuring a scanner.
    #[must_use]
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// Returns the canonical scan root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.index.root()
    }

    /// Returns the resolved file index.
    #[must_use]
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Returns the pattern cache.
    #[must_use]
    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Names of the enabled rules in registration order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs the scan and collects every complaint.
    #[must_use]
    pub fn run(self) -> ScanOutput {
        let root = self.index.root().to_path_buf();
        let mut collector = Collector::new();
        let (stats, sources) = self.scan_with(|complaint| collector.push(complaint));
        ScanOutput {
            collector,
            stats,
            sources,
            root,
        }
    }

    /// Runs the scan, handing each complaint to `emit` as it is produced.
    ///
    /// Files are visited in lexicographic order. Within a file, patterns
    /// are visited in the order rules first registered them, then matches
    /// in text order, then rules in registration order. After the last
    /// file every rule is finalized once, in registration order.
    pub fn scan_with(self, mut emit: impl FnMut(Complaint)) -> (ScanStats, SnapshotSource) {
        let Self {
            mut rules,
            overrides,
            patterns,
            by_pattern,
            index,
            scope,
            snapshot,
        } = self;

        info!("Starting scan at {}", index.root().display());
        info!("Found {} files to scan", index.file_count());

        let mut stats = ScanStats::default();
        let mut sources = SnapshotSource::new();

        for file in index.files() {
            if !scope.allows(file) {
                debug!("Out of scope: {}", file.display());
                stats.files_filtered += 1;
                continue;
            }
            let Some(text) = read_text(file) else {
                stats.files_skipped += 1;
                continue;
            };
            let Some(interested) = index.rules_for(file) else {
                continue;
            };
            debug!("Scanning: {}", file.display());
            stats.files_scanned += 1;

            let relative = index.relative(file);
            for (pattern_id, rule_ids) in &by_pattern {
                if !rule_ids.iter().any(|id| interested.contains(id)) {
                    continue;
                }
                let Some(compiled) = patterns.get(*pattern_id) else {
                    continue;
                };
                let matches = compiled.find_all(&text);
                stats.matcher_runs += 1;

                for m in &matches {
                    for &rule_id in rule_ids {
                        if !index.contains(rule_id, file) {
                            continue;
                        }
                        let ctx = MatchContext {
                            text: &text,
                            path: file,
                            relative_path: relative,
                            root: index.root(),
                            span: m.span,
                            payload: m.payload.as_ref(),
                        };
                        let rule = &mut rules[rule_id.0];
                        stats.checks += 1;
                        match rule.check(&ctx) {
                            Ok(complaints) => {
                                for complaint in complaints {
                                    emit(with_override(complaint, overrides[rule_id.0]));
                                }
                            }
                            Err(e) => {
                                warn!("Rule {} failed on {}: {}", rule.name(), file.display(), e);
                                emit(rule_failure(rule.name(), &e, Some((file, m.span))));
                            }
                        }
                    }
                }
            }

            if snapshot {
                sources.insert(file, text);
            }
        }

        for (rule, severity) in rules.iter_mut().zip(&overrides) {
            match rule.finalize() {
                Ok(complaints) => {
                    for complaint in complaints {
                        emit(with_override(complaint, *severity));
                    }
                }
                Err(e) => {
                    warn!("Rule {} failed to finalize: {}", rule.name(), e);
                    emit(rule_failure(rule.name(), &e, None));
                }
            }
        }

        info!(
            "Scan complete: {} files scanned, {} skipped, {} matcher runs",
            stats.files_scanned, stats.files_skipped, stats.matcher_runs
        );

        (stats, sources)
    }
}

/// Reads a file as UTF-8 text, or `None` if it cannot be decoded.
fn read_text(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            debug!("Skipping non-UTF-8 file: {}", path.display());
            None
        }
    }
}

fn with_override(mut complaint: Complaint, severity: Option<Severity>) -> Complaint {
    if let Some(severity) = severity {
        complaint.severity = severity;
    }
    complaint
}

/// Complaint reported in place of a failed check or finalize.
fn rule_failure(rule: &str, error: &RuleError, at: Option<(&Path, Span)>) -> Complaint {
    let complaint = Complaint::new(
        rule,
        Severity::Critical,
        format!("rule `{rule}` raised an error: {error}"),
    );
    match at {
        Some((path, span)) => complaint.with_span(path, span),
        None => complaint,
    }
}
