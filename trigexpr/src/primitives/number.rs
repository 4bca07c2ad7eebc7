//! Number literal parser
//!
//! Grammar: optionally-signed decimal or exponential literal with at most
//! one size (`K`, `M`, `G`, `T`) or time (`s`, `m`, `h`, `d`, `w`) suffix.
//! The suffix binds to the immediately preceding digit run with no space
//! and is dropped again when a further letter follows it: the parser
//! backtracks to the longest legal prefix instead of failing. Suffixes do
//! not combine with exponents.

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Size suffix characters (1024-based multipliers)
pub const SIZE_SUFFIXES: &[char] = &['K', 'M', 'G', 'T'];

/// Time suffix characters
pub const TIME_SUFFIXES: &[char] = &['s', 'm', 'h', 'd', 'w'];

fn is_suffix(byte: u8) -> bool {
    matches!(byte, b'K' | b'M' | b'G' | b'T' | b's' | b'm' | b'h' | b'd' | b'w')
}

/// A parsed number literal: magnitude plus the raw suffix character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    /// Magnitude of the literal, suffix not applied
    pub value: f64,
    /// Raw suffix character, if one was matched
    pub suffix: Option<char>,
}

impl NumberLiteral {
    /// Multiplier implied by the suffix (1 when there is none)
    pub fn multiplier(&self) -> f64 {
        match self.suffix {
            Some('K') => 1024.0,
            Some('M') => 1024.0 * 1024.0,
            Some('G') => 1024.0 * 1024.0 * 1024.0,
            Some('T') => 1024.0 * 1024.0 * 1024.0 * 1024.0,
            Some('s') | None => 1.0,
            Some('m') => 60.0,
            Some('h') => 3600.0,
            Some('d') => 86400.0,
            Some('w') => 604800.0,
            Some(_) => 1.0,
        }
    }

    /// Magnitude with the suffix multiplier applied
    pub fn scaled(&self) -> f64 {
        self.value * self.multiplier()
    }
}

/// Scan a number at `start`, returning consumed length and the literal.
///
/// With `allow_sign`, a single leading `+`/`-` is part of the literal; the
/// expression engine never sets it because unary minus is an operator
/// token there.
pub(crate) fn scan(source: &str, start: usize, allow_sign: bool) -> Option<(usize, NumberLiteral)> {
    let bytes = source.as_bytes();
    let mut pos = start;

    if allow_sign && pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    let int_len = crate::utils::chars::run_len(source, pos, |b| b.is_ascii_digit());
    pos += int_len;

    let mut frac_len = 0;
    if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
        pos += 1;
        frac_len = crate::utils::chars::run_len(source, pos, |b| b.is_ascii_digit());
        pos += frac_len;
    }

    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // Exponent part; the 'e' is only consumed when digits follow
    let mut has_exponent = false;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut probe = pos + 1;
        if probe < bytes.len() && (bytes[probe] == b'+' || bytes[probe] == b'-') {
            probe += 1;
        }
        let exp_digits = crate::utils::chars::run_len(source, probe, |b| b.is_ascii_digit());
        if exp_digits > 0 {
            has_exponent = true;
            pos = probe + exp_digits;
        }
    }

    let numeric_end = pos;

    let mut suffix = None;
    if !has_exponent && pos < bytes.len() && is_suffix(bytes[pos]) {
        let followed_by_letter =
            pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_alphabetic();
        if !followed_by_letter {
            suffix = Some(bytes[pos] as char);
            pos += 1;
        }
    }

    let value: f64 = source[start..numeric_end].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some((pos - start, NumberLiteral { value, suffix }))
}

/// Standalone number literal parser
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberParser {
    with_sign: bool,
}

impl NumberParser {
    pub fn new() -> Self {
        Self { with_sign: false }
    }

    /// Accept a single leading `+`/`-` as part of the literal
    pub fn with_sign(mut self, enabled: bool) -> Self {
        self.with_sign = enabled;
        self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<NumberLiteral> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start, self.with_sign) {
            Some((len, literal)) => Outcome::matched(source, start, len, literal),
            None => Outcome::fail(start),
        }
    }
}
