//! Function-id macro parser
//!
//! `{12345}`: the placeholder a stored trigger uses once its function
//! calls have been collapsed into database ids.

use crate::outcome::Outcome;
use crate::utils::chars::run_len;
use serde::{Deserialize, Serialize};

/// Decoded function-id macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionIdMacro {
    pub id: u64,
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, FunctionIdMacro)> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let digits_start = start + 1;
    let digits_len = run_len(source, digits_start, |b| b.is_ascii_digit());
    if digits_len == 0 || bytes.get(digits_start + digits_len) != Some(&b'}') {
        return None;
    }

    let id: u64 = source[digits_start..digits_start + digits_len].parse().ok()?;
    Some((digits_len + 2, FunctionIdMacro { id }))
}

/// Standalone function-id macro parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionIdMacroParser;

impl FunctionIdMacroParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<FunctionIdMacro> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, value)) => Outcome::matched(source, start, len, value),
            None => Outcome::fail(start),
        }
    }
}
