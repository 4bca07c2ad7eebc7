//! Item key parser
//!
//! `key` or `key[param, [nested, array], "quoted"]`. Parameters are
//! comma-separated; a parameter is a quoted string, a one-level nested
//! array, or a raw run. The parameter list is returned flat: array
//! elements appear as ordinary positioned parameters.
//!
//! An unterminated quote or bracket never fails the key outright: the
//! scan backtracks to the bare key name and leaves the bracket text for
//! the caller to report as unexplained trailing input.

use crate::config::constants::compile_time::query::MAX_KEY_PARAMETERS;
use crate::log_error;
use crate::logging::codes;
use crate::outcome::Outcome;
use crate::primitives::quoted;
use crate::utils::chars::{run_len, skip_whitespace};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// One positioned key parameter; `value` is unescaped for quoted
/// parameters and verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParameter {
    pub span: Span,
    pub value: String,
}

/// Decoded item key: name plus flattened parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKey {
    pub name: String,
    pub parameters: Vec<KeyParameter>,
}

pub(crate) fn is_key_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-')
}

/// Raw (unquoted) key parameters stop at the list punctuation only;
/// anything else, spaces included, is part of the value.
fn is_raw_param_byte(byte: u8) -> bool {
    !matches!(byte, b',' | b']' | b'[')
}

/// Scan one parameter at `pos`, pushing it (or its array elements) onto
/// `parameters`. Returns the offset after the parameter, or `None` on a
/// malformed or unterminated parameter.
fn scan_parameter(
    source: &str,
    pos: usize,
    nested: bool,
    parameters: &mut Vec<KeyParameter>,
) -> Option<usize> {
    let bytes = source.as_bytes();
    let pos = skip_whitespace(source, pos);

    match bytes.get(pos) {
        Some(b'"') => {
            let (len, content) = quoted::scan(source, pos)?;
            parameters.push(KeyParameter {
                span: Span::new(pos, pos + len),
                value: content,
            });
            // Quoted parameters must be followed by list punctuation
            let after = skip_whitespace(source, pos + len);
            match bytes.get(after) {
                Some(b',') | Some(b']') | None => Some(pos + len),
                _ => None,
            }
        }
        Some(b'[') if !nested => {
            let mut inner = pos + 1;
            loop {
                inner = scan_parameter(source, inner, true, parameters)?;
                inner = skip_whitespace(source, inner);
                match bytes.get(inner) {
                    Some(b',') => inner += 1,
                    Some(b']') => break,
                    _ => return None,
                }
            }
            // Arrays close the parameter themselves
            let after = skip_whitespace(source, inner + 1);
            match bytes.get(after) {
                Some(b',') | Some(b']') | None => Some(inner + 1),
                _ => None,
            }
        }
        _ => {
            let len = run_len(source, pos, is_raw_param_byte);
            parameters.push(KeyParameter {
                span: Span::new(pos, pos + len),
                value: source[pos..pos + len].to_string(),
            });
            Some(pos + len)
        }
    }
}

fn scan_parameter_list(source: &str, start: usize) -> Option<(usize, Vec<KeyParameter>)> {
    let bytes = source.as_bytes();
    let mut parameters = Vec::new();
    let mut pos = start + 1;

    if bytes.get(skip_whitespace(source, pos)) == Some(&b']') {
        return Some((skip_whitespace(source, pos) + 1 - start, parameters));
    }

    loop {
        pos = scan_parameter(source, pos, false, &mut parameters)?;
        pos = skip_whitespace(source, pos);
        match bytes.get(pos) {
            Some(b',') => pos += 1,
            Some(b']') => break,
            _ => return None,
        }
    }

    if parameters.len() > MAX_KEY_PARAMETERS {
        log_error!(
            codes::query::TOO_MANY_KEY_PARAMETERS,
            "item key parameter list over limit",
            "parameters" => parameters.len(),
            "limit" => MAX_KEY_PARAMETERS
        );
        return None;
    }

    Some((pos + 1 - start, parameters))
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, ItemKey)> {
    let name_len = run_len(source, start, is_key_name_byte);
    if name_len == 0 {
        return None;
    }
    let name = source[start..start + name_len].to_string();
    let mut pos = start + name_len;

    let mut parameters = Vec::new();
    if source.as_bytes().get(pos) == Some(&b'[') {
        match scan_parameter_list(source, pos) {
            Some((list_len, list)) => {
                parameters = list;
                pos += list_len;
            }
            // Malformed bracket text stays unclaimed
            None => {}
        }
    }

    Some((pos - start, ItemKey { name, parameters }))
}

/// Standalone item key parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemKeyParser;

impl ItemKeyParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<ItemKey> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, key)) => Outcome::matched(source, start, len, key),
            None => Outcome::fail(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ParseStatus;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Outcome<ItemKey> {
        ItemKeyParser::new().parse(source, 0)
    }

    fn values(key: &ItemKey) -> Vec<&str> {
        key.parameters.iter().map(|p| p.value.as_str()).collect()
    }

    #[test]
    fn test_bare_key() {
        let outcome = parse("system.cpu.load");
        assert_matches!(outcome.status, ParseStatus::Success);
        let key = outcome.value.unwrap();
        assert_eq!(key.name, "system.cpu.load");
        assert!(key.parameters.is_empty());
    }

    #[test]
    fn test_simple_parameters() {
        let outcome = parse("net.if.in[eth0,bytes]");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(values(&outcome.value.unwrap()), vec!["eth0", "bytes"]);
    }

    #[test]
    fn test_quoted_parameter_unescaped() {
        let outcome = parse(r#"log[file,"a \"b\"",skip]"#);
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(
            values(&outcome.value.unwrap()),
            vec!["file", "a \"b\"", "skip"]
        );
    }

    #[test]
    fn test_nested_array_is_flattened() {
        let outcome = parse("key[a,[b,c],d]");
        assert_matches!(outcome.status, ParseStatus::Success);
        let key = outcome.value.unwrap();
        assert_eq!(values(&key), vec!["a", "b", "c", "d"]);
        // Positions point into the original text
        assert_eq!(key.parameters[1].span, crate::utils::Span::new(7, 8));
    }

    #[test]
    fn test_empty_parameters() {
        let outcome = parse("key[,,]");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(values(&outcome.value.unwrap()), vec!["", "", ""]);
    }

    #[test]
    fn test_empty_list() {
        let outcome = parse("key[]");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert!(outcome.value.unwrap().parameters.is_empty());
    }

    #[test]
    fn test_raw_parameter_keeps_inner_spaces() {
        let outcome = parse("key[a b,c]");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(values(&outcome.value.unwrap()), vec!["a b", "c"]);
    }

    #[test]
    fn test_unterminated_bracket_backtracks_to_name() {
        let outcome = parse("key[a,b");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "key");
        assert!(outcome.value.unwrap().parameters.is_empty());
    }

    #[test]
    fn test_unterminated_quote_backtracks_to_name() {
        let outcome = parse("key[\"abc]");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "key");
    }

    #[test]
    fn test_text_after_quoted_parameter_rejected() {
        let outcome = parse("key[\"a\"b]");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "key");
    }

    #[test]
    fn test_no_second_nesting_level() {
        let outcome = parse("key[[a,[b]]]");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "key");
    }

    #[test]
    fn test_non_key_fails() {
        for source in ["", "[a]", "/x"] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }
}
