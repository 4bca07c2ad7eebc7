//! Low-level-discovery macro parser
//!
//! Two shapes share a payload: the plain `{#NAME}` reference and the
//! function form `{{#NAME}.func("pattern", output)}` that post-processes
//! the discovered value. Function arguments are quoted strings or raw runs
//! up to the next comma or closing parenthesis.

use crate::config::constants::compile_time::macros::MAX_MACRO_NAME_LENGTH;
use crate::log_error;
use crate::logging::codes;
use crate::outcome::Outcome;
use crate::primitives::quoted;
use crate::primitives::user_macro::is_macro_name_byte;
use crate::utils::chars::{run_len, skip_whitespace};
use serde::{Deserialize, Serialize};

/// Post-processing function attached to a discovery macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldFunction {
    pub name: String,
    pub args: Vec<String>,
}

/// Decoded low-level-discovery macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldMacro {
    pub name: String,
    pub function: Option<LldFunction>,
}

/// Scan the inner `{#NAME}` shape, returning length and name.
fn scan_plain(source: &str, start: usize) -> Option<(usize, String)> {
    if !source[start..].starts_with("{#") {
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
            "discovery macro name over limit",
            "length" => name_len,
            "limit" => MAX_MACRO_NAME_LENGTH
        );
        return None;
    }
    if source.as_bytes().get(name_start + name_len) != Some(&b'}') {
        return None;
    }

    let name = source[name_start..name_start + name_len].to_string();
    Some((name_len + 3, name))
}

fn is_raw_arg_byte(byte: u8) -> bool {
    !matches!(byte, b',' | b')' | b'"')
}

fn scan_function(source: &str, start: usize) -> Option<(usize, LldMacro)> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let (inner_len, name) = scan_plain(source, start + 1)?;
    let mut pos = start + 1 + inner_len;

    if bytes.get(pos) != Some(&b'.') {
        return None;
    }
    pos += 1;

    let func_len = run_len(source, pos, |b| b.is_ascii_lowercase());
    if func_len == 0 {
        return None;
    }
    let func_name = source[pos..pos + func_len].to_string();
    pos += func_len;

    if bytes.get(pos) != Some(&b'(') {
        return None;
    }
    pos += 1;

    let mut args = Vec::new();
    pos = skip_whitespace(source, pos);
    if bytes.get(pos) != Some(&b')') {
        loop {
            pos = skip_whitespace(source, pos);
            if bytes.get(pos) == Some(&b'"') {
                let (quoted_len, content) = quoted::scan(source, pos)?;
                args.push(content);
                pos += quoted_len;
            } else {
                let raw_len = run_len(source, pos, is_raw_arg_byte);
                args.push(source[pos..pos + raw_len].trim_end().to_string());
                pos += raw_len;
            }
            match bytes.get(pos) {
                Some(b',') => pos += 1,
                Some(b')') => break,
                _ => return None,
            }
        }
    }
    pos += 1;

    if bytes.get(pos) != Some(&b'}') {
        return None;
    }

    Some((
        pos + 1 - start,
        LldMacro {
            name,
            function: Some(LldFunction {
                name: func_name,
                args,
            }),
        },
    ))
}

pub(crate) fn scan(source: &str, start: usize) -> Option<(usize, LldMacro)> {
    // The function form opens with "{{#"; try it before the plain shape so
    // the outer brace is not mistaken for a malformed macro.
    if source[start..].starts_with("{{#") {
        return scan_function(source, start);
    }
    let (len, name) = scan_plain(source, start)?;
    Some((
        len,
        LldMacro {
            name,
            function: None,
        },
    ))
}

/// Standalone low-level-discovery macro parser
#[derive(Debug, Clone, Copy, Default)]
pub struct LldMacroParser;

impl LldMacroParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<LldMacro> {
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

    fn parse(source: &str) -> Outcome<LldMacro> {
        LldMacroParser::new().parse(source, 0)
    }

    #[test]
    fn test_plain_macro() {
        let outcome = parse("{#IFNAME}");
        assert_matches!(outcome.status, ParseStatus::Success);
        let value = outcome.value.unwrap();
        assert_eq!(value.name, "IFNAME");
        assert_eq!(value.function, None);
    }

    #[test]
    fn test_function_form() {
        let outcome = parse(r#"{{#IFNAME}.regsub("^eth([0-9]+)", \1)}"#);
        assert_matches!(outcome.status, ParseStatus::Success);
        let value = outcome.value.unwrap();
        assert_eq!(value.name, "IFNAME");
        let function = value.function.unwrap();
        assert_eq!(function.name, "regsub");
        assert_eq!(function.args, vec!["^eth([0-9]+)".to_string(), r"\1".to_string()]);
    }

    #[test]
    fn test_function_with_no_args() {
        let outcome = parse("{{#X}.iregsub()}");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.value.unwrap().function.unwrap().args.len(), 0);
    }

    #[test]
    fn test_unclosed_forms_fail() {
        for source in ["{#IFNAME", "{{#X}.regsub(\"a\"", "{{#X}.regsub(\"a\")", "{{#X}."] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }

    #[test]
    fn test_lowercase_name_rejected() {
        assert_matches!(parse("{#ifname}").status, ParseStatus::Fail);
    }

    #[test]
    fn test_trailing_input_is_continuable() {
        let outcome = parse("{#A} > 0");
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), "{#A}");
    }
}
