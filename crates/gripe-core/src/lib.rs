//! # gripe-core
//!
//! Core framework for rule-based text scanning over raw byte spans.
//!
//! This crate provides:
//!
//! - [`Rule`] trait: a pattern, a file scope, and a check producing [`Complaint`]s
//! - [`PatternCache`] for compiling each distinct pattern once
//! - [`FileIndex`] for resolving rule globs into file sets
//! - [`Scanner`] for dispatching matches to rules and finalizing them
//! - [`Renderer`] for source-context output
//!
//! ## Example
//!
//! ```ignore
//! use gripe_core::{DiskSource, RenderOptions, Renderer, Scanner};
//!
//! let output = Scanner::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?
//!     .run();
//!
//! let renderer = Renderer::new(RenderOptions::default(), &output.sources);
//! for complaint in output.collector.complaints() {
//!     println!("{}", renderer.render(complaint));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collector;
mod config;
mod error;
mod index;
mod rule;
mod scanner;
mod scope;
mod source;
mod types;

/// Declarative TOML rules.
pub mod declarative;
/// Pattern specifications and the pattern cache.
pub mod pattern;
/// Diagnostic rendering.
pub mod render;
/// Utility modules for rule implementations.
pub mod utils;

pub use collector::{Collector, CLEAN_MESSAGE};
pub use config::{Config, ConfigError, RuleConfig, ScannerConfig};
pub use error::{GlobKind, ScanError};
pub use index::{FileIndex, RuleGlobs, WalkOptions};
pub use pattern::{
    CallMatcher, CompiledPattern, Match, PatternCache, PatternId, PatternKey, PatternSpec,
    RegexFlags, StructuredMatcher,
};
pub use render::{RenderOptions, Renderer};
pub use rule::{
    exists_complaint, MatchContext, Rule, RuleBox, RuleError, RuleId, RuleProvider,
    DEFAULT_DESCRIPTION,
};
pub use scanner::{ScanOutput, ScanStats, Scanner, ScannerBuilder};
pub use scope::{ScopeFilter, VcsIndex};
pub use source::{DiskSource, SnapshotSource, SourceProvider};
pub use types::{Complaint, Payload, Severity, Span, SpanNotes};
