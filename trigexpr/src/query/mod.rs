//! Metric query parser
//!
//! `/<host>/<key>` optionally followed by `?[<filter>]`. The host slot
//! accepts a literal name and, behind explicit options, an empty segment,
//! a `*` wildcard, or a `{HOST.HOST}` macro. Disabled variants are
//! semantic gates: the query reports an outright mismatch even though the
//! bytes look like a query.

pub mod filter;
pub mod key;

use crate::config::ParserOptions;
use crate::log_error;
use crate::logging::codes;
use crate::outcome::Outcome;
use crate::primitives::builtin_macro;
use crate::utils::chars::{run_len, skip_whitespace};
use serde::{Deserialize, Serialize};

pub use filter::{FilterAttribute, FilterExpression, FilterOperator, FilterParser, FilterValue};
pub use key::{ItemKey, ItemKeyParser, KeyParameter};

/// The base name accepted in the host slot's macro form
const HOST_MACRO_NAME: &str = "HOST.HOST";

/// Host slot of a metric query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryHost {
    Literal(String),
    Empty,
    Wildcard,
    /// `{HOST.HOST}`, with the numbered reference when one was written
    Macro { reference: Option<u8> },
}

/// Key slot of a metric query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKey {
    Key(ItemKey),
    Wildcard,
}

/// Decoded metric query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTarget {
    pub host: QueryHost,
    pub key: QueryKey,
    pub filter: Option<FilterExpression>,
}

fn is_host_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-')
}

fn scan_host(source: &str, pos: usize, options: &ParserOptions) -> Option<(usize, QueryHost)> {
    let bytes = source.as_bytes();
    match bytes.get(pos) {
        Some(b'/') => {
            if !options.empty_host {
                log_error!(
                    codes::query::EMPTY_HOST_NOT_ENABLED,
                    "empty host segment without the empty_host option",
                    "offset" => pos
                );
                return None;
            }
            Some((0, QueryHost::Empty))
        }
        Some(b'*') => {
            if !options.calculated {
                log_error!(
                    codes::query::WILDCARD_NOT_ENABLED,
                    "wildcard host without the calculated option",
                    "offset" => pos
                );
                return None;
            }
            Some((1, QueryHost::Wildcard))
        }
        Some(b'{') => {
            let (len, value) = builtin_macro::scan(source, pos)?;
            if value.name != HOST_MACRO_NAME {
                return None;
            }
            if !options.host_macro {
                log_error!(
                    codes::query::HOST_MACRO_NOT_ENABLED,
                    "host macro without the host_macro option",
                    "offset" => pos
                );
                return None;
            }
            if value.reference.is_some() && !options.host_macro_numbered {
                log_error!(
                    codes::query::HOST_MACRO_NOT_ENABLED,
                    "numbered host macro without the host_macro_numbered option",
                    "offset" => pos
                );
                return None;
            }
            Some((
                len,
                QueryHost::Macro {
                    reference: value.reference,
                },
            ))
        }
        _ => {
            let len = run_len(source, pos, is_host_byte);
            if len == 0 {
                return None;
            }
            Some((len, QueryHost::Literal(source[pos..pos + len].to_string())))
        }
    }
}

fn scan_key(source: &str, pos: usize, options: &ParserOptions) -> Option<(usize, QueryKey)> {
    if source.as_bytes().get(pos) == Some(&b'*') {
        if !options.calculated {
            log_error!(
                codes::query::WILDCARD_NOT_ENABLED,
                "wildcard item key without the calculated option",
                "offset" => pos
            );
            return None;
        }
        return Some((1, QueryKey::Wildcard));
    }
    let (len, item_key) = key::scan(source, pos)?;
    Some((len, QueryKey::Key(item_key)))
}

/// Trailing `?[<filter>]`; a malformed filter leaves the whole suffix
/// unclaimed rather than failing the query.
fn scan_filter(
    source: &str,
    pos: usize,
    options: &ParserOptions,
) -> Option<(usize, FilterExpression)> {
    if !source[pos..].starts_with("?[") {
        return None;
    }
    let inner = skip_whitespace(source, pos + 2);
    let (len, predicate) = filter::scan_or(source, inner, 0, options)?;
    let close = skip_whitespace(source, inner + len);
    if source.as_bytes().get(close) != Some(&b']') {
        return None;
    }
    Some((close + 1 - pos, predicate))
}

pub(crate) fn scan(
    source: &str,
    start: usize,
    options: &ParserOptions,
) -> Option<(usize, QueryTarget)> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'/') {
        return None;
    }

    let (host_len, host) = scan_host(source, start + 1, options)?;
    let mut pos = start + 1 + host_len;

    if bytes.get(pos) != Some(&b'/') {
        return None;
    }
    pos += 1;

    let (key_len, key) = scan_key(source, pos, options)?;
    pos += key_len;

    let mut filter = None;
    if let Some((filter_len, predicate)) = scan_filter(source, pos, options) {
        filter = Some(predicate);
        pos += filter_len;
    }

    Some((pos - start, QueryTarget { host, key, filter }))
}

/// Metric query parser; one instance per options set.
#[derive(Debug, Clone, Default)]
pub struct MetricQueryParser {
    options: ParserOptions,
}

impl MetricQueryParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<QueryTarget> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan(source, start, &self.options) {
            Some((len, target)) => Outcome::matched(source, start, len, target),
            None => Outcome::fail(start),
        }
    }
}
