//! Period parser
//!
//! The second argument of a history function: either `#<count>` (last N
//! values) or a duration `<digits>[suffix]`, optionally followed by a
//! `:now...` time shift. Shift steps align to a unit boundary (`/h`) or
//! offset by a signed amount (`-1d`, `+30m`).

use crate::outcome::Outcome;
use crate::utils::chars::run_len;
use serde::{Deserialize, Serialize};

fn is_time_suffix(byte: u8) -> bool {
    matches!(byte, b's' | b'm' | b'h' | b'd' | b'w')
}

/// Count-or-duration part of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodRange {
    /// `#N`: the last N collected values
    LastValues(u64),
    /// `N` or `N<suffix>`: a wall-clock span, suffixless means seconds
    TimeSpan { value: u64, suffix: Option<char> },
}

impl PeriodRange {
    /// Span in seconds; last-value counts have no wall-clock equivalent
    pub fn seconds(&self) -> Option<u64> {
        match self {
            PeriodRange::LastValues(_) => None,
            PeriodRange::TimeSpan { value, suffix } => {
                let unit = match suffix {
                    None | Some('s') => 1,
                    Some('m') => 60,
                    Some('h') => 3600,
                    Some('d') => 86400,
                    Some('w') => 604800,
                    Some(_) => 1,
                };
                value.checked_mul(unit)
            }
        }
    }
}

/// One step of a `now`-based time shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftStep {
    /// `/h`: snap to the unit boundary
    Align(char),
    /// `-1d`, `+30m`: signed offset, suffixless means seconds
    Offset { amount: i64, suffix: Option<char> },
}

/// Decoded period argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub range: PeriodRange,
    pub shift: Vec<ShiftStep>,
}

fn scan_duration(source: &str, pos: usize) -> Option<(usize, u64, Option<char>)> {
    let bytes = source.as_bytes();
    let digits = run_len(source, pos, |b| b.is_ascii_digit());
    if digits == 0 {
        return None;
    }
    let value: u64 = source[pos..pos + digits].parse().ok()?;

    let mut len = digits;
    let mut suffix = None;
    if let Some(&byte) = bytes.get(pos + digits) {
        let followed_by_letter = bytes
            .get(pos + digits + 1)
            .is_some_and(|b| b.is_ascii_alphabetic());
        if is_time_suffix(byte) && !followed_by_letter {
            suffix = Some(byte as char);
            len += 1;
        }
    }
    Some((len, value, suffix))
}

fn scan_shift(source: &str, pos: usize) -> Option<(usize, Vec<ShiftStep>)> {
    let bytes = source.as_bytes();
    if !source[pos..].starts_with("now") {
        return None;
    }
    let mut cursor = pos + 3;

    let mut steps = Vec::new();
    loop {
        match bytes.get(cursor) {
            Some(b'/') => {
                let unit = *bytes.get(cursor + 1)?;
                if !is_time_suffix(unit) {
                    return None;
                }
                steps.push(ShiftStep::Align(unit as char));
                cursor += 2;
            }
            Some(sign @ (b'+' | b'-')) => {
                let (len, value, suffix) = scan_duration(source, cursor + 1)?;
                let amount = i64::try_from(value).ok()?;
                steps.push(ShiftStep::Offset {
                    amount: if *sign == b'-' { -amount } else { amount },
                    suffix,
                });
                cursor += 1 + len;
            }
            _ => break,
        }
    }

    Some((cursor - pos, steps))
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, Period)> {
    let bytes = source.as_bytes();

    let (range_len, range) = if bytes.get(start) == Some(&b'#') {
        let digits = run_len(source, start + 1, |b| b.is_ascii_digit());
        if digits == 0 {
            return None;
        }
        let count: u64 = source[start + 1..start + 1 + digits].parse().ok()?;
        if count == 0 {
            return None;
        }
        (digits + 1, PeriodRange::LastValues(count))
    } else {
        let (len, value, suffix) = scan_duration(source, start)?;
        (len, PeriodRange::TimeSpan { value, suffix })
    };

    let mut pos = start + range_len;
    let mut shift = Vec::new();
    if bytes.get(pos) == Some(&b':') {
        // A colon without a valid shift leaves the suffix unclaimed
        if let Some((shift_len, steps)) = scan_shift(source, pos + 1) {
            shift = steps;
            pos += 1 + shift_len;
        }
    }

    Some((pos - start, Period { range, shift }))
}

/// Standalone period parser
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodParser;

impl PeriodParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<Period> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, period)) => Outcome::matched(source, start, len, period),
            None => Outcome::fail(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ParseStatus;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Outcome<Period> {
        PeriodParser::new().parse(source, 0)
    }

    #[test]
    fn test_last_values() {
        let outcome = parse("#5");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_matches!(outcome.value.unwrap().range, PeriodRange::LastValues(5));
    }

    #[test]
    fn test_durations() {
        for (source, seconds) in [("30", 30), ("90s", 90), ("5m", 300), ("1h", 3600), ("2w", 1209600)] {
            let outcome = parse(source);
            assert_matches!(outcome.status, ParseStatus::Success, "source: {}", source);
            assert_eq!(outcome.value.unwrap().range.seconds(), Some(seconds));
        }
    }

    #[test]
    fn test_shift() {
        let outcome = parse("1h:now/d-1d+30m");
        assert_matches!(outcome.status, ParseStatus::Success);
        let period = outcome.value.unwrap();
        assert_eq!(
            period.shift,
            vec![
                ShiftStep::Align('d'),
                ShiftStep::Offset {
                    amount: -1,
                    suffix: Some('d')
                },
                ShiftStep::Offset {
                    amount: 30,
                    suffix: Some('m')
                },
            ]
        );
    }

    #[test]
    fn test_bare_now_shift() {
        let outcome = parse("#3:now");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert!(outcome.value.unwrap().shift.is_empty());
    }

    #[test]
    fn test_colon_without_shift_left_unclaimed() {
        let outcome = parse("1h:tomorrow");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "1h");
    }

    #[test]
    fn test_zero_count_rejected() {
        assert_matches!(parse("#0").status, ParseStatus::Fail);
    }

    #[test]
    fn test_non_periods_fail() {
        for source in ["", "#", "h", ":now"] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }
}
