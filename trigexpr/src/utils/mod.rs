//! Shared utilities for the parser family

pub(crate) mod chars;
pub mod span;

pub use span::{format_caret, Span};
