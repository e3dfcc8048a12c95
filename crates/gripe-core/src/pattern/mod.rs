//! Pattern specifications and the cache that compiles them once.
//!
//! Rules hand out a [`PatternSpec`]. The [`PatternCache`] normalizes it to
//! a [`PatternKey`] and keeps one [`CompiledPattern`] per key, so rules with
//! the same pattern share a matcher and each file is matched once per
//! distinct pattern.

pub mod call;

use crate::types::{Payload, Span};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;

pub use call::CallMatcher;

/// A single match: span plus optional payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Matched byte range.
    pub span: Span,
    /// Extra data from the matcher.
    pub payload: Option<Payload>,
}

impl Match {
    /// Creates a match without payload.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            span,
            payload: None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A parser expression that is not a plain regex.
pub trait StructuredMatcher: Send + Sync + std::fmt::Debug {
    /// Canonical identity. Two matchers with the same key must match the
    /// same spans.
    fn key(&self) -> String;

    /// Returns all matches in `text`, in order.
    fn scan(&self, text: &str) -> Vec<Match>;
}

/// Regex flags for text patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegexFlags {
    /// `i`
    pub case_insensitive: bool,
    /// `m`: `^`/`$` match at line boundaries.
    pub multi_line: bool,
    /// `s`: `.` matches `\n`.
    pub dot_matches_new_line: bool,
    /// `x`
    pub ignore_whitespace: bool,
}

impl Default for RegexFlags {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: true,
            dot_matches_new_line: true,
            ignore_whitespace: false,
        }
    }
}

impl RegexFlags {
    /// No flags set.
    #[must_use]
    pub fn none() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
        }
    }

    fn apply(self, builder: &mut RegexBuilder) {
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace);
    }
}

impl std::str::FromStr for RegexFlags {
    type Err = String;

    /// Parses a flag string such as `"ms"`. The empty string means no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::none();
        for c in s.chars() {
            match c {
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_matches_new_line = true,
                'x' => flags.ignore_whitespace = true,
                other => return Err(format!("unknown regex flag `{other}`, expected one of: imsx")),
            }
        }
        Ok(flags)
    }
}

impl std::fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (set, c) in [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
        ] {
            if set {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// What a rule searches for.
#[derive(Debug, Clone)]
pub enum PatternSpec {
    /// One match spanning the whole file.
    Everything,
    /// A regular expression.
    Text {
        /// Regex source.
        source: String,
        /// Flags to compile with.
        flags: RegexFlags,
    },
    /// A structured parser expression.
    Structured(Arc<dyn StructuredMatcher>),
}

impl PatternSpec {
    /// A regex with default flags. An empty source means [`PatternSpec::Everything`].
    pub fn text(source: impl Into<String>) -> Self {
        Self::text_with_flags(source, RegexFlags::default())
    }

    /// A regex with explicit flags.
    pub fn text_with_flags(source: impl Into<String>, flags: RegexFlags) -> Self {
        let source = source.into();
        if source.is_empty() {
            Self::Everything
        } else {
            Self::Text { source, flags }
        }
    }

    /// Wraps a structured matcher.
    pub fn structured(matcher: impl StructuredMatcher + 'static) -> Self {
        Self::Structured(Arc::new(matcher))
    }

    /// Normalized identity of this spec.
    #[must_use]
    pub fn key(&self) -> PatternKey {
        match self {
            Self::Everything => PatternKey::Everything,
            Self::Text { source, .. } if source.is_empty() => PatternKey::Everything,
            Self::Text { source, flags } => PatternKey::Text {
                source: source.clone(),
                flags: flags.to_string(),
            },
            Self::Structured(m) => PatternKey::Structured(m.key()),
        }
    }
}

/// Cache key of a pattern. Keys of different kinds never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternKey {
    /// Always-matching pattern.
    Everything,
    /// Regex source and canonical flag string.
    Text {
        /// Regex source.
        source: String,
        /// Canonical flags, e.g. `"ms"`.
        flags: String,
    },
    /// Structured matcher key.
    Structured(String),
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Everything => write!(f, "<everything>"),
            Self::Text { source, flags } => write!(f, "/{source}/{flags}"),
            Self::Structured(key) => write!(f, "{key}"),
        }
    }
}

#[derive(Debug)]
enum Matcher {
    Everything,
    Regex(Regex),
    Structured(Arc<dyn StructuredMatcher>),
}

/// A normalized, ready-to-run pattern.
#[derive(Debug)]
pub struct CompiledPattern {
    key: PatternKey,
    matcher: Matcher,
}

impl CompiledPattern {
    /// Compiles a spec.
    ///
    /// # Errors
    ///
    /// Returns an error if a text pattern is not a valid regex.
    pub fn compile(spec: &PatternSpec) -> Result<Self, regex::Error> {
        let key = spec.key();
        let matcher = match spec {
            PatternSpec::Text { source, flags } if !source.is_empty() => {
                let mut builder = RegexBuilder::new(source);
                flags.apply(&mut builder);
                Matcher::Regex(builder.build()?)
            }
            PatternSpec::Everything | PatternSpec::Text { .. } => Matcher::Everything,
            PatternSpec::Structured(m) => Matcher::Structured(Arc::clone(m)),
        };
        Ok(Self { key, matcher })
    }

    /// Identity of this pattern.
    #[must_use]
    pub fn key(&self) -> &PatternKey {
        &self.key
    }

    /// Returns every match in `text`, in order.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<Match> {
        match &self.matcher {
            Matcher::Everything => vec![Match::new(Span::new(0, text.len()))],
            Matcher::Regex(re) => {
                let names: Vec<&str> = re.capture_names().flatten().collect();
                re.captures_iter(text)
                    .filter_map(|caps| {
                        let whole = caps.get(0)?;
                        let mut m = Match::new(whole.range().into());
                        if !names.is_empty() {
                            let payload = names.iter().fold(Payload::new(), |p, name| {
                                match caps.name(name) {
                                    Some(g) => p.with_group(*name, g.range().into()),
                                    None => p,
                                }
                            });
                            m = m.with_payload(payload);
                        }
                        Some(m)
                    })
                    .collect()
            }
            Matcher::Structured(m) => m.scan(text),
        }
    }
}

/// Index of a pattern in a [`PatternCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(pub usize);

/// Compiles each distinct pattern once.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: Vec<Arc<CompiledPattern>>,
    by_key: HashMap<PatternKey, PatternId>,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the pattern for `spec`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if a text pattern is not a valid regex.
    pub fn normalize(&mut self, spec: &PatternSpec) -> Result<PatternId, regex::Error> {
        let key = spec.key();
        if let Some(id) = self.by_key.get(&key) {
            return Ok(*id);
        }
        let compiled = CompiledPattern::compile(spec)?;
        let id = PatternId(self.patterns.len());
        self.patterns.push(Arc::new(compiled));
        self.by_key.insert(key, id);
        Ok(id)
    }

    /// Returns a compiled pattern.
    #[must_use]
    pub fn get(&self, id: PatternId) -> Option<&Arc<CompiledPattern>> {
        self.patterns.get(id.0)
    }

    /// Number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if nothing was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
