//! Utility functions for rule implementations.

pub mod text;

#[doc(inline)]
pub use text::{line_separator, lines_and_numbers, SpanLayout};
