//! # gripe-rules
//!
//! Built-in rules for gripe.
//!
//! Mostly small, self-contained rules for Python projects. They double as
//! worked examples of the [`Rule`] trait: plain matches, matches filtered by
//! context, rules that report from `finalize`, and multi-file complaints.
//!
//! ## Available Rules
//!
//! | Name | Severity | Description |
//! |------|----------|-------------|
//! | `easy-print` | warning | Every `print(` call |
//! | `complex-print` | warning | `print(` calls that are not commented out |
//! | `cached-print` | warning | All `print(` calls, reported once at the end |
//! | `readme-reference` | warning | Classes missing from `README.md` |
//! | `use-pformat` | warning | `pprint(...)` calls outside tests |
//! | `todo-in-source` | warning | `TODO` markers in code |
//! | `todo-in-docs` | critical | `TODO` markers in Markdown |
//!
//! ## Usage
//!
//! ```ignore
//! use gripe_core::Scanner;
//! use gripe_rules::{ComplexPrint, UsePformat};
//!
//! let output = Scanner::builder()
//!     .root(".")
//!     .rule(ComplexPrint::new())
//!     .rule(UsePformat::new())
//!     .build()?
//!     .run();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cached_print;
mod complex_print;
mod easy_print;
mod presets;
mod readme_reference;
mod todo;
mod use_pformat;

pub use cached_print::CachedPrint;
pub use complex_print::ComplexPrint;
pub use easy_print::EasyPrint;
pub use presets::{all_rules, configured_rules, python_rules, Preset, UnknownPreset};
pub use readme_reference::ReadmeReference;
pub use todo::{TodoInDocs, TodoInSource};
pub use use_pformat::UsePformat;

/// Re-export core types for convenience.
pub use gripe_core::{Complaint, Rule, Severity};

/// Pattern shared by the print rules, so a file is searched only once for
/// all of them.
pub(crate) const PRINT_PATTERN: &str = r"\bprint\s*\(";

/// Globs shared by the Python rules.
pub(crate) fn python_globs() -> Vec<String> {
    vec!["*.py".to_string()]
}

#[cfg(test)]
pub(crate) mod testing {
    use gripe_core::{Complaint, Rule, Scanner};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes `files` under a fresh directory.
    pub fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, text) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        dir
    }

    /// Runs a single rule over `root`.
    pub fn scan<R: Rule + 'static>(root: &Path, rule: R) -> Vec<Complaint> {
        Scanner::builder()
            .root(root)
            .rule(rule)
            .build()
            .unwrap()
            .run()
            .collector
            .into_complaints()
    }

    /// `(relative path, start)` of the first span of every complaint.
    pub fn locations(root: &Path, complaints: &[Complaint]) -> Vec<(String, usize)> {
        let root = root.canonicalize().unwrap();
        complaints
            .iter()
            .flat_map(|c| {
                c.file_spans.iter().flat_map(|(path, spans)| {
                    spans.keys().map(|span| {
                        let rel = path.strip_prefix(&root).unwrap_or(path);
                        (rel.display().to_string(), span.start)
                    })
                })
            })
            .collect()
    }
}
