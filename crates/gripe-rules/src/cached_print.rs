//! Rule collecting uncommented `print(` calls and reporting them at the end.
//!
//! # Rationale
//!
//! Shows a rule holding private state across the run: `check` only fills a
//! cache, `finalize` hands the cached complaints back once every file has
//! been scanned.

use crate::{python_globs, PRINT_PATTERN};
use gripe_core::{
    exists_complaint, Complaint, MatchContext, PatternSpec, Rule, RuleError, Severity,
};
use tracing::debug;

/// Rule name for cached-print.
pub const NAME: &str = "cached-print";

/// Like `complex-print`, but reports from `finalize`.
#[derive(Debug, Clone)]
pub struct CachedPrint {
    /// Severity of the complaints.
    pub severity: Severity,
    cache: Vec<Complaint>,
}

impl Default for CachedPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl CachedPrint {
    /// Creates a new rule with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            cache: Vec::new(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Number of complaints waiting for `finalize`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.cache.len()
    }
}

impl Rule for CachedPrint {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Print statements can slow down code."
    }

    fn pattern(&self) -> PatternSpec {
        PatternSpec::text(PRINT_PATTERN)
    }

    fn globs(&self) -> Vec<String> {
        python_globs()
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        if !ctx.line_prefix().contains('#') {
            let complaint = exists_complaint(self, ctx);
            self.cache.push(complaint);
        }
        Ok(vec![])
    }

    fn finalize(&mut self) -> Result<Vec<Complaint>, RuleError> {
        debug!("{NAME}: releasing {} cached complaints", self.cache.len());
        Ok(std::mem::take(&mut self.cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{locations, tree};
    use gripe_core::Scanner;
    use std::path::Path;

    #[test]
    fn check_only_fills_the_cache() {
        let mut rule = CachedPrint::new();
        let text = "print(1)\n# print(2)\n";
        for span in [gripe_core::Span::new(0, 6), gripe_core::Span::new(11, 17)] {
            let ctx = MatchContext {
                text,
                path: Path::new("/r/a.py"),
                relative_path: Path::new("a.py"),
                root: Path::new("/r"),
                span,
                payload: None,
            };
            assert!(rule.check(&ctx).unwrap().is_empty());
        }
        assert_eq!(rule.pending(), 1);
        assert_eq!(rule.finalize().unwrap().len(), 1);
        assert_eq!(rule.pending(), 0);
    }

    #[test]
    fn complaints_arrive_after_regular_rules() {
        let dir = tree(&[("a.py", "print(1)\n"), ("b.py", "# print(2)\nprint(3)\n")]);
        let output = Scanner::builder()
            .root(dir.path())
            .rule(CachedPrint::new())
            .rule(crate::EasyPrint::new())
            .build()
            .unwrap()
            .run();
        let rules: Vec<&str> = output
            .collector
            .complaints()
            .iter()
            .map(|c| c.rule.as_str())
            .collect();
        assert_eq!(
            rules,
            vec!["easy-print", "easy-print", "easy-print", NAME, NAME]
        );
        let cached: Vec<_> = output
            .collector
            .complaints()
            .iter()
            .filter(|c| c.rule == NAME)
            .cloned()
            .collect();
        assert_eq!(
            locations(dir.path(), &cached),
            vec![("a.py".into(), 0), ("b.py".into(), 11)]
        );
    }
}
