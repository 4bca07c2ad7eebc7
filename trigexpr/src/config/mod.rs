//! Parser configuration
//!
//! Compile-time limits live in [`constants`]; per-instance behavior is the
//! typed [`ParserOptions`] struct, configured once at construction and
//! immutable afterwards.

pub mod constants;
pub mod options;

pub use options::{BuiltinMacros, ParserOptions};
