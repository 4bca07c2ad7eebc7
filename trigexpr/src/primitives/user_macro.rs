//! User macro parser
//!
//! `{$NAME}` or `{$NAME:context}`. Names are uppercase alphanumerics plus
//! `_` and `.`; the context is either a quoted string (unescaped in the
//! payload) or a raw run up to the closing brace.

use crate::config::constants::compile_time::macros::MAX_MACRO_NAME_LENGTH;
use crate::log_error;
use crate::logging::codes;
use crate::outcome::Outcome;
use crate::primitives::quoted;
use crate::utils::chars::run_len;
use serde::{Deserialize, Serialize};

/// Decoded user macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMacro {
    pub name: String,
    pub context: Option<String>,
}

pub(crate) fn is_macro_name_byte(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_' || byte == b'.'
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, UserMacro)> {
    let bytes = source.as_bytes();
    if !source[start..].starts_with("{$") {
        return None;
    }

    let name_start = start + 2;
    let name_len = run_len(source, name_start, is_macro_name_byte);
    if name_len == 0 {
        return None;
    }
    if name_len > MAX_MACRO_NAME_LENGTH {
        log_error!(
            codes::macros::MACRO_NAME_TOO_LONG,
            "user macro name over limit",
            "length" => name_len,
            "limit" => MAX_MACRO_NAME_LENGTH
        );
        return None;
    }
    let name = source[name_start..name_start + name_len].to_string();

    let mut pos = name_start + name_len;
    match bytes.get(pos) {
        Some(b'}') => Some((
            pos + 1 - start,
            UserMacro {
                name,
                context: None,
            },
        )),
        Some(b':') => {
            pos += 1;
            let context = if bytes.get(pos) == Some(&b'"') {
                let (quoted_len, content) = quoted::scan(source, pos)?;
                pos += quoted_len;
                content
            } else {
                let raw_len = run_len(source, pos, |b| b != b'}');
                let raw = source[pos..pos + raw_len].to_string();
                pos += raw_len;
                raw
            };
            if bytes.get(pos) != Some(&b'}') {
                return None;
            }
            Some((
                pos + 1 - start,
                UserMacro {
                    name,
                    context: Some(context),
                },
            ))
        }
        _ => None,
    }
}

/// Standalone user macro parser
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMacroParser;

impl UserMacroParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<UserMacro> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start) {
            Some((len, value)) => Outcome::matched(source, start, len, value),
            None => Outcome::fail(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ParseStatus;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Outcome<UserMacro> {
        UserMacroParser::new().parse(source, 0)
    }

    #[test]
    fn test_plain_macro() {
        let outcome = parse("{$LOAD.MAX}");
        assert_matches!(outcome.status, ParseStatus::Success);
        let value = outcome.value.unwrap();
        assert_eq!(value.name, "LOAD.MAX");
        assert_eq!(value.context, None);
    }

    #[test]
    fn test_raw_context() {
        let outcome = parse("{$LOW:eth0}");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.value.unwrap().context.as_deref(), Some("eth0"));
    }

    #[test]
    fn test_quoted_context() {
        let outcome = parse(r#"{$LOW:"a}b"}"#);
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.value.unwrap().context.as_deref(), Some("a}b"));
    }

    #[test]
    fn test_empty_context_allowed() {
        let outcome = parse("{$A:}");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.value.unwrap().context.as_deref(), Some(""));
    }

    #[test]
    fn test_unclosed_macro_fails() {
        for source in ["{$A", "{$A:ctx", "{$"] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }

    #[test]
    fn test_lowercase_name_rejected() {
        assert_matches!(parse("{$low}").status, ParseStatus::Fail);
    }

    #[test]
    fn test_trailing_input_is_continuable() {
        let outcome = parse("{$A}=1");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "{$A}");
    }
}
