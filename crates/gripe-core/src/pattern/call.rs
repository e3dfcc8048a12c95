//! Structured matcher for function calls: `name(...)` with balanced
//! parentheses, ignoring comments and string literals.

use super::{Match, StructuredMatcher};
use crate::types::{Payload, Span};

/// Payload group holding the span between the parentheses.
pub const ARGS_GROUP: &str = "args";

/// Matches calls of one function name.
///
/// ```
/// use gripe_core::pattern::{CallMatcher, StructuredMatcher};
///
/// let matcher = CallMatcher::new("pprint");
/// let matches = matcher.scan("pprint(x)  # pprint(y)\n");
/// assert_eq!(matches.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMatcher {
    name: String,
    comment_prefix: Option<String>,
    skip_strings: bool,
}

impl CallMatcher {
    /// Matches `name(...)`, skipping `#` comments and string literals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment_prefix: Some("#".to_string()),
            skip_strings: true,
        }
    }

    /// Sets the line comment prefix. `None` disables comment skipping.
    #[must_use]
    pub fn comment_prefix(mut self, prefix: Option<String>) -> Self {
        self.comment_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Sets whether string literals are skipped.
    #[must_use]
    pub fn skip_strings(mut self, skip: bool) -> Self {
        self.skip_strings = skip;
        self
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the byte index after a comment or string starting at `i`,
    /// or `None` if neither starts there.
    fn skip_ignored(&self, bytes: &[u8], i: usize) -> Option<usize> {
        if let Some(prefix) = &self.comment_prefix {
            if bytes[i..].starts_with(prefix.as_bytes()) {
                return Some(
                    bytes[i..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(bytes.len(), |p| i + p),
                );
            }
        }
        if self.skip_strings && matches!(bytes[i], b'"' | b'\'') {
            return Some(skip_string(bytes, i));
        }
        None
    }

    /// Finds the `)` matching the `(` at `open`.
    fn find_close(&self, bytes: &[u8], open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while i < bytes.len() {
            if let Some(next) = self.skip_ignored(bytes, i) {
                i = next;
                continue;
            }
            match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }
}

impl StructuredMatcher for CallMatcher {
    fn key(&self) -> String {
        format!(
            "call:{};comments={};strings={}",
            self.name,
            self.comment_prefix.as_deref().unwrap_or_default(),
            self.skip_strings
        )
    }

    fn scan(&self, text: &str) -> Vec<Match> {
        let bytes = text.as_bytes();
        let name = self.name.as_bytes();
        let mut matches = Vec::new();
        if name.is_empty() {
            return matches;
        }

        let mut i = 0;
        while i < bytes.len() {
            if let Some(next) = self.skip_ignored(bytes, i) {
                i = next;
                continue;
            }
            if bytes[i..].starts_with(name) && (i == 0 || !is_ident(bytes[i - 1])) {
                let mut open = i + name.len();
                while open < bytes.len() && bytes[open].is_ascii_whitespace() {
                    open += 1;
                }
                if bytes.get(open) == Some(&b'(') {
                    if let Some(close) = self.find_close(bytes, open) {
                        let payload =
                            Payload::new().with_group(ARGS_GROUP, Span::new(open + 1, close));
                        matches.push(Match::new(Span::new(i, close + 1)).with_payload(payload));
                        i = close + 1;
                        continue;
                    }
                }
            }
            i += 1;
        }
        matches
    }
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Returns the index after the string literal starting at `start`.
///
/// Triple-quoted strings may span lines; other strings end at the closing
/// quote or, if unterminated, at the end of the line.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let triple = [quote; 3];
    if bytes[start..].starts_with(&triple) {
        let body = start + 3;
        return bytes[body..]
            .windows(3)
            .position(|w| w == triple)
            .map_or(bytes.len(), |p| body + p + 3);
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
