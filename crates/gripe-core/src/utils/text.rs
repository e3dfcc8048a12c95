//! Line and column helpers over raw text.
//!
//! All offsets are byte offsets. Columns returned here count characters
//! and are 0-based; callers add 1 for display.

use crate::types::Span;

/// Detects the line separator of `text`.
///
/// Checks for `\r\n` first, then `\r`, and falls back to `\n`.
#[must_use]
pub fn line_separator(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else if text.contains('\r') {
        "\r"
    } else {
        "\n"
    }
}

/// Splits `text` into lines on `sep`.
///
/// A trailing separator does not produce an extra empty line.
#[must_use]
pub fn split_lines<'t>(text: &'t str, sep: &str) -> Vec<&'t str> {
    let mut lines: Vec<&str> = text.split(sep).collect();
    if text.ends_with(sep) {
        lines.pop();
    }
    lines
}

/// Moves `offset` back to the closest character boundary at or before it,
/// clamped to the text length.
#[must_use]
pub fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Clamps a span to `text` and to character boundaries.
#[must_use]
pub fn clamp_span(text: &str, span: Span) -> Span {
    Span::new(floor_boundary(text, span.start), floor_boundary(text, span.end))
}

/// Where a span sits in its file, in line terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLayout {
    /// The span after clamping to the text.
    pub span: Span,
    /// 0-based line of the span start.
    pub first_line: usize,
    /// 0-based line of the span end.
    pub last_line: usize,
    /// Byte offset of the first line's start.
    pub first_line_start: usize,
    /// Byte offset of the last line's start.
    pub last_line_start: usize,
    /// Bytes between the first line's start and the span start.
    pub left_indent: usize,
    /// Bytes between the span end and the next separator (or end of text).
    pub right_indent: usize,
    /// 0-based character column of the span start.
    pub start_column: usize,
    /// 0-based character column of the span end on the last line.
    pub end_column: usize,
    /// True if a separator occurs inside the span.
    pub multiline: bool,
}

impl SpanLayout {
    /// Computes the layout of `span` in `text` using separator `sep`.
    #[must_use]
    pub fn locate(text: &str, span: Span, sep: &str) -> Self {
        let span = clamp_span(text, span);
        let before = &text[..span.start];
        let inside = &text[span.start..span.end];

        let first_line = before.matches(sep).count();
        let first_line_start = before.rfind(sep).map_or(0, |i| i + sep.len());
        let multiline = inside.contains(sep);
        let last_line = first_line + inside.matches(sep).count();
        let last_line_start = inside
            .rfind(sep)
            .map_or(first_line_start, |i| span.start + i + sep.len());

        let right_indent = text[span.end..]
            .find(sep)
            .unwrap_or(text.len() - span.end);

        Self {
            span,
            first_line,
            last_line,
            first_line_start,
            last_line_start,
            left_indent: span.start - first_line_start,
            right_indent,
            start_column: text[first_line_start..span.start].chars().count(),
            end_column: text[last_line_start..span.end].chars().count(),
            multiline,
        }
    }

    /// Returns the part of the first line covered by a single-line span.
    ///
    /// For multiline spans this is the tail of the first line.
    #[must_use]
    pub fn highlighted<'t>(&self, text: &'t str, sep: &str) -> &'t str {
        let line_end = text[self.first_line_start..]
            .find(sep)
            .map_or(text.len(), |i| self.first_line_start + i);
        let end = if self.multiline {
            line_end
        } else {
            self.span.end
        };
        &text[self.span.start..end]
    }
}

/// Returns the lines touched by `span` together with their 0-based numbers.
///
/// Lines are split on `\n`; a `\r` before it stays part of the line.
#[must_use]
pub fn lines_and_numbers(text: &str, span: Span) -> (Vec<&str>, Vec<usize>) {
    let span = clamp_span(text, span);
    let first = text[..span.start].matches('\n').count();
    let last = first + text[span.start..span.end].matches('\n').count();

    let section_start = text[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let section_end = text[span.end..]
        .find('\n')
        .map_or(text.len(), |i| span.end + i);

    let lines = text[section_start..section_end].split('\n').collect();
    (lines, (first..=last).collect())
}
