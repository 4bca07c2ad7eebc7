//! Universal parse outcome protocol
//!
//! Every parser in the family exposes the same contract:
//! `parse(source, start) -> Outcome<T>`. The outcome is three-valued:
//!
//! - [`ParseStatus::Success`]: a complete match that consumed everything
//!   from `start` to the end of the source.
//! - [`ParseStatus::SuccessContinuable`]: a complete match followed by
//!   trailing input the grammar cannot extend into (unterminated quote,
//!   dangling operator, unclosed macro brace after the matched prefix).
//! - [`ParseStatus::Fail`]: no match; no characters are claimed.
//!
//! The matched text of any non-Fail outcome is itself a complete parse:
//! re-parsing it alone yields `Success` with an identical value. Callers
//! sequencing sub-parsers downgrade `Success` to `SuccessContinuable`
//! whenever trailing input remains unexplained; this single rule lets
//! simple parsers embed in richer ones without special-casing trailing
//! garbage at every nesting level.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued parse status shared by the whole parser family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    /// Matched from `start` through the end of the source
    Success,
    /// Matched a complete prefix; unexplained input follows the match
    SuccessContinuable,
    /// No match at `start`; no characters claimed
    Fail,
}

impl ParseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseStatus::Success)
    }

    pub fn is_continuable(&self) -> bool {
        matches!(self, ParseStatus::SuccessContinuable)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, ParseStatus::Fail)
    }

    /// Check if anything was matched (Success or SuccessContinuable)
    pub fn is_matched(&self) -> bool {
        !self.is_fail()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStatus::Success => "success",
            ParseStatus::SuccessContinuable => "success-continuable",
            ParseStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one parse call: status, matched range, matched text, and the
/// structured payload built for the match.
///
/// Immutable and self-contained; the payload owns every nested match, so
/// the outcome stays valid after the source string is dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub status: ParseStatus,
    /// Matched byte range; empty range at `start` for Fail
    pub span: Span,
    /// Matched slice, owned; empty for Fail
    pub text: String,
    /// Structured payload; `None` iff Fail
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    /// Build a non-Fail outcome for a match of `len` bytes at `start`.
    ///
    /// Status is Success when the match reaches the end of the source and
    /// SuccessContinuable otherwise.
    pub(crate) fn matched(source: &str, start: usize, len: usize, value: T) -> Self {
        let span = Span::new(start, start + len);
        let status = if span.end == source.len() {
            ParseStatus::Success
        } else {
            ParseStatus::SuccessContinuable
        };
        Self {
            status,
            span,
            text: span.slice(source).to_string(),
            value: Some(value),
        }
    }

    /// Build a Fail outcome at `start`.
    pub(crate) fn fail(start: usize) -> Self {
        Self {
            status: ParseStatus::Fail,
            span: Span::empty(start),
            text: String::new(),
            value: None,
        }
    }

    /// The number of bytes consumed by the match (0 for Fail)
    pub fn length(&self) -> usize {
        self.span.len()
    }

    /// The matched slice (empty for Fail)
    pub fn matched_text(&self) -> &str {
        &self.text
    }

    pub fn is_fail(&self) -> bool {
        self.status.is_fail()
    }
}
