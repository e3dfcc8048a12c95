//! Turns complaints into source-context text.
//!
//! Full mode, one context line:
//!
//! ```text
//! critical - complex-print: Print statements can slow down code.
//!  --> app.py[3:5]
//!      2| def main():
//!      3|     print(x)
//!       |     ^^^^^^^^ --> remove this
//!      4|     return x
//!   = help: Use logging instead.
//! ```
//!
//! Line and column numbers are 1-indexed; columns count characters.

use crate::source::SourceProvider;
use crate::types::{Complaint, Span, SpanNotes};
use crate::utils::text::{self, SpanLayout};
use std::path::{Path, PathBuf};

/// Column width used for wrapping.
pub const DEFAULT_WIDTH: usize = 120;

/// How complaints are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Lines of source shown before and after each span.
    pub context_lines: usize,
    /// One line per complaint, no source context.
    pub inline: bool,
    /// Wrap width.
    pub width: usize,
    /// Paths are shown relative to this directory when possible.
    pub root: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            context_lines: 1,
            inline: false,
            width: DEFAULT_WIDTH,
            root: None,
        }
    }
}

/// Renders complaints using text from a [`SourceProvider`].
pub struct Renderer<'s> {
    options: RenderOptions,
    sources: &'s dyn SourceProvider,
}

impl<'s> Renderer<'s> {
    /// Creates a renderer.
    #[must_use]
    pub fn new(options: RenderOptions, sources: &'s dyn SourceProvider) -> Self {
        Self { options, sources }
    }

    /// Renders one complaint. The result has no trailing newline.
    #[must_use]
    pub fn render(&self, complaint: &Complaint) -> String {
        let header = format!(
            "{} - {}: {}",
            complaint.severity, complaint.rule, complaint.description
        );
        let mut out = wrap(&header, self.options.width, "", "    ");

        if self.options.inline {
            let locations = self.inline_locations(complaint);
            if !locations.is_empty() {
                if let Some(last) = out.last_mut() {
                    last.push_str(" --> ");
                    last.push_str(&locations.join(", "));
                }
            }
        } else {
            for (path, spans) in &complaint.file_spans {
                self.render_file(&mut out, path, spans);
            }
        }

        if let Some(help) = &complaint.help {
            out.extend(wrap(
                &format!("= help: {help}"),
                self.options.width,
                "  ",
                "    ",
            ));
        }

        out.join("\n")
    }

    fn display_path(&self, path: &Path) -> String {
        let shown = self
            .options
            .root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        shown.display().to_string()
    }

    fn inline_locations(&self, complaint: &Complaint) -> Vec<String> {
        let mut locations = Vec::new();
        for (path, spans) in &complaint.file_spans {
            let shown = self.display_path(path);
            match self.sources.source(path) {
                Ok(text) => {
                    let sep = text::line_separator(&text);
                    for span in spans.keys() {
                        let layout = SpanLayout::locate(&text, *span, sep);
                        locations.push(format!("{shown}{}", location(&layout)));
                    }
                }
                Err(e) => locations.push(format!("{shown} (source unavailable: {e})")),
            }
        }
        locations
    }

    fn render_file(&self, out: &mut Vec<String>, path: &Path, spans: &SpanNotes) {
        let shown = self.display_path(path);
        let text = match self.sources.source(path) {
            Ok(text) => text,
            Err(e) => {
                out.push(format!(" --> {shown} (source unavailable: {e})"));
                return;
            }
        };
        let sep = text::line_separator(&text);
        let lines = text::split_lines(&text, sep);
        let context = self.options.context_lines;

        for (i, (span, note)) in spans.iter().enumerate() {
            let layout = SpanLayout::locate(&text, *span, sep);
            out.push(format!(" --> {shown}{}", location(&layout)));

            for n in layout.first_line.saturating_sub(context)..layout.first_line {
                out.push(source_line(n, lines.get(n).copied().unwrap_or_default()));
            }

            for n in layout.first_line..=layout.last_line {
                let line = lines.get(n).copied().unwrap_or_default();
                out.push(source_line(n, line));
                if let Some(marker) = marker_line(&layout, n, line, &text) {
                    out.push(marker);
                }
            }

            if let Some(note) = note {
                self.append_note(out, note);
            }

            let after_end = (layout.last_line + 1 + context).min(lines.len());
            for n in layout.last_line + 1..after_end {
                out.push(source_line(n, lines[n]));
            }

            if i + 1 < spans.len() {
                out.push("  [...]".to_string());
            }
        }
    }

    fn append_note(&self, out: &mut Vec<String>, note: &str) {
        let Some(last) = out.pop() else {
            return;
        };
        let prefix = format!("{last} --> ");
        let indent = prefix.chars().count();
        let room = self.options.width.saturating_sub(indent).max(20);
        let mut wrapped = wrap(note, room, "", "").into_iter();
        out.push(format!("{prefix}{}", wrapped.next().unwrap_or_default()));
        out.extend(wrapped.map(|l| format!("{}{l}", " ".repeat(indent))));
    }
}

/// `[l:c]` or `[l:c to l:c]`, 1-indexed.
fn location(layout: &SpanLayout) -> String {
    if layout.multiline {
        format!(
            "[{}:{} to {}:{}]",
            layout.first_line + 1,
            layout.start_column + 1,
            layout.last_line + 1,
            layout.end_column + 1
        )
    } else {
        format!("[{}:{}]", layout.first_line + 1, layout.start_column + 1)
    }
}

fn source_line(n: usize, line: &str) -> String {
    format!("{:>6}| {line}", n + 1)
}

/// Caret line under line `n` of a span, or `None` if nothing on that line
/// is covered.
fn marker_line(layout: &SpanLayout, n: usize, line: &str, text: &str) -> Option<String> {
    let chars = |s: &str| s.chars().count();
    let prefix = |bytes: usize| line.get(..bytes.min(line.len())).unwrap_or(line);

    let (pad, count) = if !layout.multiline {
        let covered = layout.span.slice(text).map_or(0, chars);
        (chars(prefix(layout.left_indent)), covered.max(1))
    } else if n == layout.first_line {
        let pad = chars(prefix(layout.left_indent));
        (pad, chars(line).saturating_sub(pad))
    } else if n == layout.last_line {
        (0, chars(prefix(layout.span.end - layout.last_line_start)))
    } else {
        (0, chars(line))
    };

    (count > 0).then(|| format!("{:>6}| {}{}", "", " ".repeat(pad), "^".repeat(count)))
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize, initial: &str, subsequent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = initial.to_string();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let needed = current.chars().count() + usize::from(has_word) + word.chars().count();
        if has_word && needed > width {
            lines.push(std::mem::replace(&mut current, subsequent.to_string()));
            has_word = false;
        }
        if has_word {
            current.push(' ');
        }
        current.push_str(word);
        has_word = true;
    }
    if has_word || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Returns the highlighted part of the first line of `span`.
///
/// For a single-line span this is exactly the matched text.
#[must_use]
pub fn highlighted(text: &str, span: Span) -> &str {
    let sep = text::line_separator(text);
    SpanLayout::locate(text, span, sep).highlighted(text, sep)
}
