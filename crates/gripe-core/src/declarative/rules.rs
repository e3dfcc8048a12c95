//! Declarative rule implementation.
//!
//! Converts a validated [`DeclaredRule`] into a [`Rule`].

use super::model::{CheckStrategy, DeclaredRule, RulePattern};
use crate::pattern::{CallMatcher, PatternSpec};
use crate::rule::{exists_complaint, MatchContext, Rule, RuleError};
use crate::types::{Complaint, Severity};

/// A rule defined in a `[[rule]]` table.
#[derive(Debug, Clone)]
pub struct DeclarativeRule {
    rule: DeclaredRule,
}

impl DeclarativeRule {
    /// Wraps a validated declaration.
    #[must_use]
    pub fn new(rule: DeclaredRule) -> Self {
        Self { rule }
    }
}

impl Rule for DeclarativeRule {
    fn name(&self) -> &str {
        self.rule.name.as_str()
    }

    fn description(&self) -> &str {
        &self.rule.description
    }

    fn pattern(&self) -> PatternSpec {
        match &self.rule.pattern {
            RulePattern::Everything => PatternSpec::Everything,
            RulePattern::Regex { source, flags } => {
                PatternSpec::text_with_flags(source.clone(), *flags)
            }
            RulePattern::Call {
                name,
                comment,
                skip_strings,
            } => PatternSpec::structured(
                CallMatcher::new(name.clone())
                    .comment_prefix(comment.clone())
                    .skip_strings(*skip_strings),
            ),
        }
    }

    fn globs(&self) -> Vec<String> {
        self.rule.globs.clone()
    }

    fn exclude_globs(&self) -> Vec<String> {
        self.rule.exclude_globs.clone()
    }

    fn severity(&self) -> Severity {
        self.rule.severity
    }

    fn help(&self) -> Option<String> {
        self.rule.help.clone()
    }

    fn check(&mut self, ctx: &MatchContext<'_>) -> Result<Vec<Complaint>, RuleError> {
        if let CheckStrategy::SkipCommented { marker } = &self.rule.strategy {
            if ctx.line_prefix().contains(marker.as_str()) {
                return Ok(vec![]);
            }
        }
        Ok(vec![exists_complaint(self, ctx)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarative::model::RuleName;
    use crate::pattern::{PatternKey, RegexFlags};
    use crate::types::Span;
    use std::path::Path;

    fn declared(strategy: CheckStrategy) -> DeclaredRule {
        DeclaredRule {
            name: RuleName::new("print").unwrap(),
            description: "print found".into(),
            pattern: RulePattern::Regex {
                source: r"print\(".into(),
                flags: RegexFlags::default(),
            },
            globs: vec!["*.py".into()],
            exclude_globs: vec![],
            severity: Severity::Warning,
            help: Some("use logging".into()),
            strategy,
        }
    }

    fn check(rule: &mut DeclarativeRule, text: &str, span: Span) -> Vec<Complaint> {
        let ctx = MatchContext {
            text,
            path: Path::new("/r/a.py"),
            relative_path: Path::new("a.py"),
            root: Path::new("/r"),
            span,
            payload: None,
        };
        rule.check(&ctx).unwrap()
    }

    #[test]
    fn exists_strategy_reports_every_match() {
        let mut rule = DeclarativeRule::new(declared(CheckStrategy::Exists));
        let complaints = check(&mut rule, "# print(1)", Span::new(2, 8));
        assert_eq!(complaints.len(), 1);
        assert_eq!(complaints[0].severity, Severity::Warning);
        assert_eq!(complaints[0].help.as_deref(), Some("use logging"));
    }

    #[test]
    fn skip_commented_strategy() {
        let mut rule = DeclarativeRule::new(declared(CheckStrategy::SkipCommented {
            marker: "#".into(),
        }));
        let text = "print(1)\n# print(2)\n";
        assert_eq!(check(&mut rule, text, Span::new(0, 6)).len(), 1);
        assert!(check(&mut rule, text, Span::new(11, 17)).is_empty());
    }

    #[test]
    fn call_pattern_becomes_structured() {
        let mut d = declared(CheckStrategy::Exists);
        d.pattern = RulePattern::Call {
            name: "pprint".into(),
            comment: None,
            skip_strings: false,
        };
        let rule = DeclarativeRule::new(d);
        assert_eq!(
            rule.pattern().key(),
            PatternKey::Structured("call:pprint;comments=;strings=false".into())
        );
    }
}
