//! Core types for spans, severities and complaints.

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Severity level for complaints.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, but does not fail the run.
    Warning,
    /// Fails the run with exit code 1.
    #[default]
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" | "warn" => Ok(Self::Warning),
            "critical" | "error" => Ok(Self::Critical),
            _ => Err(format!("unknown severity `{s}`, expected: warning, critical")),
        }
    }
}

/// Half-open byte range `[start, end)` into a file's raw text.
///
/// Ordering is by `start`, then `end`, which is the order spans are
/// rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span. An `end` before `start` collapses to an empty span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Creates an empty span at `offset`.
    #[must_use]
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for zero-length spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the covered text, or `None` if the span is out of bounds or
    /// does not sit on character boundaries.
    #[must_use]
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }

    /// Shifts the span by `offset` bytes.
    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Extra data a matcher attaches to a match.
///
/// Text patterns fill it with their named capture groups; structured
/// matchers use it for the sub-spans they parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    groups: BTreeMap<String, Span>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named sub-span.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, span: Span) -> Self {
        self.groups.insert(name.into(), span);
        self
    }

    /// Returns the span recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Span> {
        self.groups.get(name).copied()
    }

    /// Returns the text recorded under `name`.
    #[must_use]
    pub fn text<'t>(&self, name: &str, text: &'t str) -> Option<&'t str> {
        self.get(name).and_then(|span| span.slice(text))
    }

    /// Iterates over all named sub-spans in name order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, Span)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Spans of one file, each with an optional short note.
pub type SpanNotes = BTreeMap<Span, Option<String>>;

/// A complaint produced by a rule.
///
/// A single complaint may point into several files, for example a
/// definition in one file and the place it should be referenced in another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    /// Name of the rule that produced this complaint.
    pub rule: String,
    /// Severity of this complaint.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
    /// Optional hint on how to fix the problem.
    pub help: Option<String>,
    /// Spans per file, each with an optional note.
    pub file_spans: BTreeMap<PathBuf, SpanNotes>,
}

impl Complaint {
    /// Creates a complaint without any spans.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            description: description.into(),
            help: None,
            file_spans: BTreeMap::new(),
        }
    }

    /// Adds a span without a note.
    #[must_use]
    pub fn with_span(mut self, path: impl Into<PathBuf>, span: Span) -> Self {
        self.file_spans
            .entry(path.into())
            .or_default()
            .insert(span, None);
        self
    }

    /// Adds a span with a note.
    #[must_use]
    pub fn with_note(
        mut self,
        path: impl Into<PathBuf>,
        span: Span,
        note: impl Into<String>,
    ) -> Self {
        self.file_spans
            .entry(path.into())
            .or_default()
            .insert(span, Some(note.into()));
        self
    }

    /// Adds a help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the help text from an optional value.
    #[must_use]
    pub fn with_optional_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }

    /// Total number of spans over all files.
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.file_spans.values().map(BTreeMap::len).sum()
    }

    /// Returns the spans recorded for `path`.
    #[must_use]
    pub fn spans_in(&self, path: &Path) -> Option<&SpanNotes> {
        self.file_spans.get(path)
    }

    /// Returns true if this complaint fails the run.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

impl std::fmt::Display for Complaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {}", self.severity, self.rule, self.description)
    }
}

impl Serialize for Complaint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Complaint", 5)?;
        state.serialize_field("rule", &self.rule)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("help", &self.help)?;
        state.serialize_field("files", &FileSpansSer(&self.file_spans))?;
        state.end()
    }
}

// Span keys are not strings, so the per-file maps serialize as lists.
struct FileSpansSer<'a>(&'a BTreeMap<PathBuf, SpanNotes>);

impl Serialize for FileSpansSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SpanEntry<'a> {
            start: usize,
            end: usize,
            note: Option<&'a str>,
        }

        #[derive(Serialize)]
        struct FileEntry<'a> {
            path: &'a Path,
            spans: Vec<SpanEntry<'a>>,
        }

        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (path, spans) in self.0 {
            let spans = spans
                .iter()
                .map(|(span, note)| SpanEntry {
                    start: span.start,
                    end: span.end,
                    note: note.as_deref(),
                })
                .collect();
            seq.serialize_element(&FileEntry { path, spans })?;
        }
        seq.end()
    }
}
