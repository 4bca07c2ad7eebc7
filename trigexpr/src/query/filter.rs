//! Attribute filter parser
//!
//! The boolean predicate a metric query may carry inside `?[...]`:
//! `tag`/`group` comparisons with `=`, `=~`, `!=`, `!~`, combined with
//! `and`, `or`, `not` and parentheses. Comparison values are quoted
//! strings or macros of an enabled family.

use crate::config::ParserOptions;
use crate::outcome::Outcome;
use crate::primitives::{lld_macro, quoted, user_macro, LldMacro, UserMacro};
use crate::utils::chars::{is_ident_continuation, skip_whitespace, word_at};
use serde::{Deserialize, Serialize};

/// Filterable item attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterAttribute {
    Tag,
    Group,
}

impl FilterAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterAttribute::Tag => "tag",
            FilterAttribute::Group => "group",
        }
    }
}

/// Comparison operator inside a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    Matches,
    NotEqual,
    NotMatches,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equal => "=",
            FilterOperator::Matches => "=~",
            FilterOperator::NotEqual => "!=",
            FilterOperator::NotMatches => "!~",
        }
    }
}

/// Right-hand side of a filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Quoted(String),
    UserMacro(UserMacro),
    LldMacro(LldMacro),
}

/// Parsed filter predicate tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpression {
    Condition {
        attribute: FilterAttribute,
        operator: FilterOperator,
        value: FilterValue,
    },
    Not(Box<FilterExpression>),
    And(Box<FilterExpression>, Box<FilterExpression>),
    Or(Box<FilterExpression>, Box<FilterExpression>),
}

/// A reserved word only acts as one when not glued to identifier text.
fn keyword_at(source: &str, pos: usize, word: &str) -> bool {
    word_at(source, pos, word)
        && !source
            .as_bytes()
            .get(pos + word.len())
            .copied()
            .is_some_and(is_ident_continuation)
}

fn scan_value(source: &str, pos: usize, options: &ParserOptions) -> Option<(usize, FilterValue)> {
    let bytes = source.as_bytes();
    match bytes.get(pos)? {
        b'"' => {
            let (len, content) = quoted::scan(source, pos)?;
            Some((len, FilterValue::Quoted(content)))
        }
        b'{' if options.user_macros && bytes.get(pos + 1) == Some(&b'$') => {
            let (len, value) = user_macro::scan(source, pos)?;
            Some((len, FilterValue::UserMacro(value)))
        }
        b'{' if options.lld_macros => {
            let (len, value) = lld_macro::scan(source, pos)?;
            Some((len, FilterValue::LldMacro(value)))
        }
        _ => None,
    }
}

fn scan_condition(
    source: &str,
    pos: usize,
    options: &ParserOptions,
) -> Option<(usize, FilterExpression)> {
    let attribute = if keyword_at(source, pos, "tag") {
        FilterAttribute::Tag
    } else if keyword_at(source, pos, "group") {
        FilterAttribute::Group
    } else {
        return None;
    };

    let mut cursor = skip_whitespace(source, pos + attribute.as_str().len());
    let operator = if word_at(source, cursor, "=~") {
        FilterOperator::Matches
    } else if word_at(source, cursor, "!=") {
        FilterOperator::NotEqual
    } else if word_at(source, cursor, "!~") {
        FilterOperator::NotMatches
    } else if word_at(source, cursor, "=") {
        FilterOperator::Equal
    } else {
        return None;
    };
    cursor += operator.as_str().len();

    cursor = skip_whitespace(source, cursor);
    let (value_len, value) = scan_value(source, cursor, options)?;

    Some((
        cursor + value_len - pos,
        FilterExpression::Condition {
            attribute,
            operator,
            value,
        },
    ))
}

fn scan_unary(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, FilterExpression)> {
    if depth >= options.max_depth {
        return None;
    }

    if keyword_at(source, pos, "not") {
        let operand_pos = skip_whitespace(source, pos + 3);
        let (len, operand) = scan_unary(source, operand_pos, depth + 1, options)?;
        return Some((
            operand_pos + len - pos,
            FilterExpression::Not(Box::new(operand)),
        ));
    }

    if source.as_bytes().get(pos) == Some(&b'(') {
        let inner_pos = skip_whitespace(source, pos + 1);
        let (len, inner) = scan_or(source, inner_pos, depth + 1, options)?;
        let close = skip_whitespace(source, inner_pos + len);
        if source.as_bytes().get(close) != Some(&b')') {
            return None;
        }
        return Some((close + 1 - pos, inner));
    }

    scan_condition(source, pos, options)
}

fn scan_and(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, FilterExpression)> {
    let (mut len, mut left) = scan_unary(source, pos, depth, options)?;
    loop {
        let after = skip_whitespace(source, pos + len);
        if !keyword_at(source, after, "and") {
            break;
        }
        let right_pos = skip_whitespace(source, after + 3);
        match scan_unary(source, right_pos, depth, options) {
            Some((right_len, right)) => {
                left = FilterExpression::And(Box::new(left), Box::new(right));
                len = right_pos + right_len - pos;
            }
            None => break,
        }
    }
    Some((len, left))
}

pub(crate) fn scan_or(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, FilterExpression)> {
    let (mut len, mut left) = scan_and(source, pos, depth, options)?;
    loop {
        let after = skip_whitespace(source, pos + len);
        if !keyword_at(source, after, "or") {
            break;
        }
        let right_pos = skip_whitespace(source, after + 2);
        match scan_and(source, right_pos, depth, options) {
            Some((right_len, right)) => {
                left = FilterExpression::Or(Box::new(left), Box::new(right));
                len = right_pos + right_len - pos;
            }
            None => break,
        }
    }
    Some((len, left))
}

/// Standalone attribute filter parser; parses the predicate itself, the
/// `?[`..`]` wrapping belongs to the metric query.
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    options: ParserOptions,
}

impl FilterParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str, start: usize) -> Outcome<FilterExpression> {
        assert!(start <= source.len(), "start offset beyond end of source");

        match scan_or(source, start, 0, &self.options) {
            Some((len, filter)) => Outcome::matched(source, start, len, filter),
            None => Outcome::fail(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ParseStatus;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Outcome<FilterExpression> {
        FilterParser::new(ParserOptions::default()).parse(source, 0)
    }

    #[test]
    fn test_single_condition() {
        let outcome = parse(r#"tag="env""#);
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_matches!(
            outcome.value.unwrap(),
            FilterExpression::Condition {
                attribute: FilterAttribute::Tag,
                operator: FilterOperator::Equal,
                value: FilterValue::Quoted(v),
            } if v == "env"
        );
    }

    #[test]
    fn test_all_operators() {
        for (source, operator) in [
            (r#"group="db""#, FilterOperator::Equal),
            (r#"group=~"db""#, FilterOperator::Matches),
            (r#"group!="db""#, FilterOperator::NotEqual),
            (r#"group!~"db""#, FilterOperator::NotMatches),
        ] {
            let outcome = parse(source);
            assert_matches!(outcome.status, ParseStatus::Success, "source: {}", source);
            assert_matches!(
                outcome.value.unwrap(),
                FilterExpression::Condition { operator: op, .. } if op == operator
            );
        }
    }

    #[test]
    fn test_boolean_structure() {
        let outcome = parse(r#"tag="a" and (group="b" or not tag="c")"#);
        assert_matches!(outcome.status, ParseStatus::Success);
        let FilterExpression::And(_, right) = outcome.value.unwrap() else {
            panic!("expected and at the root");
        };
        assert_matches!(*right, FilterExpression::Or(_, _));
    }

    #[test]
    fn test_or_binds_loosest() {
        let outcome = parse(r#"tag="a" or tag="b" and tag="c""#);
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_matches!(outcome.value.unwrap(), FilterExpression::Or(_, _));
    }

    #[test]
    fn test_macro_value_gating() {
        let source = r#"tag={$ENV}"#;
        assert_matches!(parse(source).status, ParseStatus::Fail);

        let permissive = FilterParser::new(ParserOptions::new().with_user_macros(true));
        let outcome = permissive.parse(source, 0);
        assert_matches!(outcome.status, ParseStatus::Success);
        assert_matches!(
            outcome.value.unwrap(),
            FilterExpression::Condition {
                value: FilterValue::UserMacro(m),
                ..
            } if m.name == "ENV"
        );
    }

    #[test]
    fn test_unquoted_value_rejected() {
        assert_matches!(parse("tag=env").status, ParseStatus::Fail);
    }

    #[test]
    fn test_glued_keyword_stops_the_parse() {
        let outcome = parse(r#"tag="a" andtag="b""#);
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), r#"tag="a""#);
    }

    #[test]
    fn test_dangling_and_is_not_consumed() {
        let outcome = parse(r#"tag="a" and"#);
        assert_matches!(outcome.status, ParseStatus::SuccessContinuable);
        assert_eq!(outcome.matched_text(), r#"tag="a""#);
    }
}
