//! Source location tracking for trigger expressions
//!
//! Trigger expressions are single-line strings, so locations are plain byte
//! offsets. Exact offsets and lengths are load-bearing for downstream
//! validators and editor highlighters.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` in the source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Byte offset of the first matched character (0-based)
    pub start: usize,
    /// Byte offset one past the last matched character
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Create an empty span at an offset
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Get the byte length of this span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if this span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains a byte offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if this span fully contains another span
    pub fn contains_span(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Check if this span overlaps another span
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Combine this span with another to create a span covering both
    pub fn to(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Get the source text for this span from the input
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Format an error message with the source line and a caret underline.
///
/// Intended for human-facing highlighters; the parser itself only reports
/// offsets and lengths.
pub fn format_caret(source: &str, span: Span, message: &str) -> String {
    let mut result = String::new();

    result.push_str(&format!("Error: {}\n", message));
    result.push_str(&format!("  --> offset {}\n", span.start));
    result.push_str(&format!("   | {}\n", source));

    let mut underline = String::from("   | ");
    for _ in 0..span.start.min(source.len()) {
        underline.push(' ');
    }
    for _ in 0..span.len().max(1) {
        underline.push('^');
    }
    result.push_str(&underline);
    result.push('\n');

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_length() {
        let span = Span::new(3, 10);
        assert_eq!(span.len(), 7);
        assert!(!span.is_empty());
        assert!(Span::empty(5).is_empty());
    }

    #[test]
    fn test_span_containment() {
        let outer = Span::new(2, 12);
        let inner = Span::new(4, 8);

        assert!(outer.contains_span(&inner));
        assert!(!inner.contains_span(&outer));
        assert!(outer.contains(2));
        assert!(!outer.contains(12));
    }

    #[test]
    fn test_span_overlap() {
        let a = Span::new(0, 5);
        let b = Span::new(5, 9);
        let c = Span::new(4, 6);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_span_slice() {
        let source = "last(/host/key)";
        let span = Span::new(5, 14);
        assert_eq!(span.slice(source), "/host/key");
    }

    #[test]
    fn test_caret_rendering() {
        let source = "1 + fresh";
        let rendered = format_caret(source, Span::new(4, 9), "unexpected identifier");

        assert!(rendered.contains("unexpected identifier"));
        assert!(rendered.contains("offset 4"));
        assert!(rendered.contains("^^^^^"));
    }
}
