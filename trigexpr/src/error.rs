//! Error taxonomy
//!
//! Grammar mismatches are never Rust errors: they surface as `Fail` or
//! `SuccessContinuable` outcomes carrying exact offsets, so callers can
//! retry at another offset, try a different sub-grammar, or hand the
//! location to a highlighter. The only `Err` values in this crate come
//! from configuration handling.

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid options TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,

    #[error("host_macro_numbered requires host_macro")]
    NumberedHostMacroWithoutHostMacro,
}
