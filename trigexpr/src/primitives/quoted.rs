//! Quoted string parser
//!
//! `"..."` with exactly two escapes: `\"` and `\\`. Any other byte after a
//! backslash is a grammar violation and fails the whole string, as does a
//! missing closing quote.

use crate::outcome::Outcome;

/// Scan a quoted string at `start`, returning consumed length (including
/// both quotes) and the unescaped content.
pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, String)> {
    let mut chars = source[start..].char_indices();

    match chars.next() {
        Some((_, '"')) => {}
        _ => return None,
    }

    let mut content = String::new();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '"' => return Some((offset + 1, content)),
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => content.push(escaped),
                _ => return None,
            },
            other => content.push(other),
        }
    }

    // Unterminated
    None
}

/// Standalone quoted string parser; the payload is the unescaped content.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedStringParser;

impl QuotedStringParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<String> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, content)) => Outcome::matched(source, start, len, content),
            None => Outcome::fail(start),
        }
    }
}
