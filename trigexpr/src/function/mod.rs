//! Function call parser
//!
//! `<identifier>(<args>)` with two argument grammars. Names in the
//! history table whose first argument is a metric query use the history
//! grammar: query, optional period, then free literal parameters. Every
//! other call is a math function whose arguments are full nested
//! expressions, which is also the fallback for history names used
//! arithmetically (`min(min(/host/key,1h), 125)`).

pub mod period;

use crate::config::constants::compile_time::function::MAX_FUNCTION_PARAMETERS;
use crate::config::ParserOptions;
use crate::expression::token::{FunctionCall, Parameter, ParameterKind};
use crate::log_error;
use crate::logging::codes;
use crate::outcome::Outcome;
use crate::primitives::quoted;
use crate::query;
use crate::utils::chars::{run_len, skip_whitespace};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

pub use period::{Period, PeriodParser, PeriodRange, ShiftStep};

/// Functions whose first argument addresses historical data
pub const HISTORY_FUNCTIONS: &[&str] = &[
    "date",
    "dayofmonth",
    "dayofweek",
    "now",
    "time",
    "last",
    "min",
    "max",
    "avg",
    "sum",
    "count",
    "find",
    "nodata",
    "fuzzytime",
    "logeventid",
    "logseverity",
    "logsource",
    "percentile",
    "forecast",
    "timeleft",
    "trendavg",
    "trendcount",
    "trendmax",
    "trendmin",
    "trendsum",
    "band",
];

pub fn is_history_function(name: &str) -> bool {
    HISTORY_FUNCTIONS.contains(&name)
}

/// Which argument grammar a call was parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    History,
    Math,
}

/// A call plus the grammar that recognized it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCall {
    pub kind: CallKind,
    pub call: FunctionCall,
}

/// Scan a free literal parameter: a quoted string, or a raw run up to
/// the next top-level `,`/`)`. Quoted sections and `[`..`]` nesting hide
/// the closing parenthesis.
fn scan_free_parameter(source: &str, pos: usize) -> Option<(usize, ParameterKind)> {
    let bytes = source.as_bytes();

    if bytes.get(pos) == Some(&b'"') {
        let (len, content) = quoted::scan(source, pos)?;
        let after = skip_whitespace(source, pos + len);
        if !matches!(bytes.get(after), Some(b',') | Some(b')')) {
            return None;
        }
        return Some((len, ParameterKind::Quoted(content)));
    }

    let mut cursor = pos;
    let mut bracket_depth = 0usize;
    loop {
        match bytes.get(cursor) {
            Some(b'"') => {
                let (len, _) = quoted::scan(source, cursor)?;
                cursor += len;
            }
            Some(b'[') => {
                bracket_depth += 1;
                cursor += 1;
            }
            Some(b']') => {
                bracket_depth = bracket_depth.checked_sub(1)?;
                cursor += 1;
            }
            Some(b',') | Some(b')') if bracket_depth == 0 => break,
            Some(_) => cursor += 1,
            None => return None,
        }
    }

    Some((
        cursor - pos,
        ParameterKind::Unquoted(source[pos..cursor].to_string()),
    ))
}

fn parameter(source: &str, start: usize, len: usize, kind: ParameterKind) -> Parameter {
    let span = Span::new(start, start + len);
    Parameter {
        span,
        text: span.slice(source).to_string(),
        kind,
    }
}

/// History grammar: query, optional period, free parameters. The query
/// already matched when this runs; its failure modes fail the whole call
/// upstream.
fn scan_history_args(
    source: &str,
    args_start: usize,
    query_len: usize,
    query_value: query::QueryTarget,
) -> Option<(usize, Vec<Parameter>)> {
    let bytes = source.as_bytes();
    let mut parameters = vec![parameter(
        source,
        args_start,
        query_len,
        ParameterKind::Query(query_value),
    )];

    let mut pos = skip_whitespace(source, args_start + query_len);
    let mut first_tail_arg = true;
    loop {
        match bytes.get(pos) {
            Some(b')') => return Some((pos + 1, parameters)),
            Some(b',') => {
                pos = skip_whitespace(source, pos + 1);

                // The argument after the query is a period when one fits
                if first_tail_arg {
                    first_tail_arg = false;
                    if let Some((len, value)) = period::scan(source, pos) {
                        let after = skip_whitespace(source, pos + len);
                        if matches!(bytes.get(after), Some(b',') | Some(b')')) {
                            parameters.push(parameter(
                                source,
                                pos,
                                len,
                                ParameterKind::Period(value),
                            ));
                            pos = after;
                            continue;
                        }
                    }
                }

                let (len, kind) = scan_free_parameter(source, pos)?;
                parameters.push(parameter(source, pos, len, kind));
                pos = skip_whitespace(source, pos + len);
            }
            _ => return None,
        }
    }
}

/// Math grammar: every comma-separated argument is a nested expression.
fn scan_math_args(
    source: &str,
    args_start: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, Vec<Parameter>)> {
    let bytes = source.as_bytes();
    let mut parameters = Vec::new();

    let mut pos = skip_whitespace(source, args_start);
    if bytes.get(pos) == Some(&b')') {
        return Some((pos + 1, parameters));
    }

    loop {
        let (len, group) = crate::expression::scan_group(source, pos, depth + 1, options)?;
        parameters.push(parameter(
            source,
            pos,
            len,
            ParameterKind::Expression(group),
        ));
        pos = skip_whitespace(source, pos + len);
        match bytes.get(pos) {
            Some(b',') => pos = skip_whitespace(source, pos + 1),
            Some(b')') => return Some((pos + 1, parameters)),
            _ => return None,
        }
    }
}

pub(crate) fn scan(
    source: &str,
    start: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, ParsedCall)> {
    let bytes = source.as_bytes();

    let name_len = run_len(source, start, |b| b.is_ascii_lowercase());
    if name_len == 0 || bytes.get(start + name_len) != Some(&b'(') {
        return None;
    }
    let name = &source[start..start + name_len];
    let args_start = start + name_len + 1;

    let history = is_history_function(name);
    let first = skip_whitespace(source, args_start);

    let (end, kind, parameters) = if history && bytes.get(first) == Some(&b')') {
        // Zero-argument history call, e.g. now()
        (first + 1, CallKind::History, Vec::new())
    } else if history && bytes.get(first) == Some(&b'/') {
        // First argument is a query: the history grammar is committed,
        // and a bad or gated query fails the whole call
        let (query_len, query_value) = query::scan(source, first, options)?;
        let (end, parameters) = scan_history_args(source, first, query_len, query_value)?;
        (end, CallKind::History, parameters)
    } else {
        let (end, parameters) = scan_math_args(source, args_start, depth, options)?;
        (end, CallKind::Math, parameters)
    };

    if parameters.len() > MAX_FUNCTION_PARAMETERS {
        log_error!(
            codes::function::TOO_MANY_PARAMETERS,
            "function parameter list over limit",
            "function" => name,
            "parameters" => parameters.len(),
            "limit" => MAX_FUNCTION_PARAMETERS
        );
        return None;
    }

    Some((
        end - start,
        ParsedCall {
            kind,
            call: FunctionCall {
                name: name.to_string(),
                parameters,
            },
        },
    ))
}

/// Function call parser; one instance per options set.
#[derive(Debug, Clone, Default)]
pub struct FunctionParser {
    options: ParserOptions,
}

impl FunctionParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<ParsedCall> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start, 0, &self.options) {
            Some((len, parsed)) => Outcome::matched(source, start, len, parsed),
            None => Outcome::fail(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ParseStatus;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Outcome<ParsedCall> {
        FunctionParser::new(ParserOptions::default()).parse(source, 0)
    }

    #[test]
    fn test_history_call() {
        let outcome = parse("last(/web-01/system.cpu.load)");
        assert_matches!(outcome.status, ParseStatus::Success);
        let parsed = outcome.value.unwrap();
        assert_eq!(parsed.kind, CallKind::History);
        assert_eq!(parsed.call.name, "last");
        assert_matches!(parsed.call.parameters[0].kind, ParameterKind::Query(_));
    }

    #[test]
    fn test_history_call_with_period_and_free_params() {
        let outcome = parse(r#"count(/host/key, 10m:now/h, "eq", "error")"#);
        assert_matches!(outcome.status, ParseStatus::Success);
        let call = outcome.value.unwrap().call;
        assert_eq!(call.parameters.len(), 4);
        assert_matches!(call.parameters[1].kind, ParameterKind::Period(_));
        assert_matches!(
            &call.parameters[2].kind,
            ParameterKind::Quoted(v) if v == "eq"
        );
    }

    #[test]
    fn test_zero_argument_history_call() {
        let outcome = parse("now()");
        assert_matches!(outcome.status, ParseStatus::Success);
        let parsed = outcome.value.unwrap();
        assert_eq!(parsed.kind, CallKind::History);
        assert!(parsed.call.parameters.is_empty());
    }

    #[test]
    fn test_second_argument_not_a_period_becomes_free_param() {
        let outcome = parse("find(/host/key,,\"like\",\"text\")");
        assert_matches!(outcome.status, ParseStatus::Success);
        let call = outcome.value.unwrap().call;
        assert_matches!(&call.parameters[1].kind, ParameterKind::Unquoted(v) if v.is_empty());
    }

    #[test]
    fn test_close_paren_hidden_by_key_brackets() {
        let outcome = parse("last(/host/proc.num[,,run)])");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.matched_text(), "last(/host/proc.num[,,run)])");
    }

    #[test]
    fn test_math_call_with_nested_expressions() {
        let outcome = parse("min(min(/host/key,1h), 125)");
        assert_matches!(outcome.status, ParseStatus::Success);
        let parsed = outcome.value.unwrap();
        assert_eq!(parsed.kind, CallKind::Math);
        assert_eq!(parsed.call.parameters.len(), 2);
        assert_matches!(parsed.call.parameters[0].kind, ParameterKind::Expression(_));
    }

    #[test]
    fn test_math_call_named_not() {
        let outcome = parse("not(1)");
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_eq!(outcome.value.unwrap().kind, CallKind::Math);
    }

    #[test]
    fn test_gated_query_fails_the_call() {
        assert_matches!(parse("last(/*/key)").status, ParseStatus::Fail);
        assert_matches!(parse("last(//key)").status, ParseStatus::Fail);
    }

    #[test]
    fn test_unclosed_call_fails() {
        for source in ["last(/host/key", "last(/host/key,", "min(1,"] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }

    #[test]
    fn test_not_a_call_fails() {
        for source in ["last", "last /host/key)", "Last(1)", "9last(1)"] {
            assert_matches!(parse(source).status, ParseStatus::Fail, "source: {}", source);
        }
    }
}
