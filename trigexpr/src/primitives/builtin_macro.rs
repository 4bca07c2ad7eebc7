//! Built-in macro parser
//!
//! `{NAME.PATH}` with an optional single-digit reference suffix, e.g.
//! `{HOST.HOST}` or `{HOST.HOST2}`. The gated variant checks the base name
//! against the configured allow-list before claiming any input.

use crate::config::BuiltinMacros;
use crate::outcome::Outcome;
use crate::utils::chars::run_len;
use serde::{Deserialize, Serialize};

/// Decoded built-in macro: base name plus optional numbered reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinMacro {
    pub name: String,
    pub reference: Option<u8>,
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b'.' || byte == b'_'
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, BuiltinMacro)> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let name_start = start + 1;
    if !bytes.get(name_start)?.is_ascii_uppercase() {
        return None;
    }

    let name_len = run_len(source, name_start, is_name_byte);
    let mut pos = name_start + name_len;

    let mut reference = None;
    if let Some(digit @ b'1'..=b'9') = bytes.get(pos).copied() {
        reference = Some(digit - b'0');
        pos += 1;
    }

    if bytes.get(pos) != Some(&b'}') {
        return None;
    }

    let name = source[name_start..name_start + name_len].to_string();
    Some((pos + 1 - start, BuiltinMacro { name, reference }))
}

/// Built-in macro parser carrying the allow-list
#[derive(Debug, Clone, Default)]
pub struct BuiltinMacroParser {
    allowed: BuiltinMacros,
}

impl BuiltinMacroParser {
    pub fn new(allowed: BuiltinMacros) -> Self {
        Self { allowed }
    }

    /// Parse a built-in macro; a syntactic match whose base name is not in
    /// the allow-list is reported as an outright mismatch.
    pub fn parse(&self, source: &str, start: usize) -> Outcome<BuiltinMacro> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, value)) if self.allowed.allows(&value.name) => {
                Outcome::matched(source, start, len, value)
            }
            _ => Outcome::fail(start),
        }
    }
}
