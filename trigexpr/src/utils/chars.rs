//! Byte-level scanning helpers shared by the parser family
//!
//! The grammar is ASCII at every decision point; non-ASCII bytes are only
//! legal inside quoted strings and macro contexts, where they are copied
//! through verbatim.

/// Characters that can continue an identifier; a reserved word followed by
/// one of these is never split off as an operator.
pub(crate) fn is_ident_continuation(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Check for an expression whitespace byte
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Advance past whitespace, returning the first non-whitespace offset
pub(crate) fn skip_whitespace(source: &str, mut pos: usize) -> usize {
    let bytes = source.as_bytes();
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Length of the run of bytes at `pos` satisfying `pred`
pub(crate) fn run_len<F>(source: &str, pos: usize, pred: F) -> usize
where
    F: Fn(u8) -> bool,
{
    let bytes = source.as_bytes();
    let mut end = pos;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end - pos
}

/// Check that the literal `word` occurs at `pos`
pub(crate) fn word_at(source: &str, pos: usize, word: &str) -> bool {
    source.as_bytes()[pos..].starts_with(word.as_bytes())
}
