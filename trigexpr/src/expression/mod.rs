//! Expression parser
//!
//! The operator-precedence engine tying the whole family together.
//! Binary tiers from loosest to tightest: `or`, `and`, comparisons,
//! additive, multiplicative; then unary prefixes and primaries. Each
//! tier consumes `(operator, operand)` pairs left-associatively and
//! backtracks over a dangling operator whose right side never
//! materializes, so the longest complete prefix wins.

pub mod token;

use crate::config::constants::compile_time::expression::MAX_EXPRESSION_LENGTH;
use crate::config::ParserOptions;
use crate::function;
use crate::logging::codes;
use crate::outcome::{Outcome, ParseStatus};
use crate::primitives::{
    builtin_macro, function_id_macro, lld_macro, number, quoted, user_macro,
};
use crate::utils::chars::{is_ident_continuation, skip_whitespace, word_at};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};

pub use token::{
    ExpressionGroup, FunctionCall, Operator, Parameter, ParameterKind, Token, TokenKind,
};

/// Binary operator tiers, loosest first
const TIER_OR: u8 = 0;
const TIER_AND: u8 = 1;
const TIER_COMPARISON: u8 = 2;
const TIER_ADDITIVE: u8 = 3;
const TIER_MULTIPLICATIVE: u8 = 4;

/// A reserved word acts as an operator only when the character after it
/// cannot continue an identifier; `1 and1` stops rather than splits.
fn keyword_operator_at(source: &str, pos: usize, word: &str) -> bool {
    word_at(source, pos, word)
        && !source
            .as_bytes()
            .get(pos + word.len())
            .copied()
            .is_some_and(is_ident_continuation)
}

fn match_operator(source: &str, pos: usize, tier: u8) -> Option<(usize, Operator)> {
    let bytes = source.as_bytes();
    match tier {
        TIER_OR if keyword_operator_at(source, pos, "or") => Some((2, Operator::Or)),
        TIER_AND if keyword_operator_at(source, pos, "and") => Some((3, Operator::And)),
        TIER_COMPARISON => match bytes.get(pos)? {
            b'<' if bytes.get(pos + 1) == Some(&b'>') => Some((2, Operator::NotEqual)),
            b'<' => Some((1, Operator::Less)),
            b'>' => Some((1, Operator::Greater)),
            b'=' => Some((1, Operator::Equal)),
            _ => None,
        },
        TIER_ADDITIVE => match bytes.get(pos)? {
            b'+' => Some((1, Operator::Plus)),
            b'-' => Some((1, Operator::Minus)),
            _ => None,
        },
        TIER_MULTIPLICATIVE => match bytes.get(pos)? {
            b'*' => Some((1, Operator::Multiply)),
            b'/' => Some((1, Operator::Divide)),
            _ => None,
        },
        _ => None,
    }
}

fn push_token(tokens: &mut Vec<Token>, source: &str, span: Span, kind: TokenKind) {
    tokens.push(Token::new(source, span, kind));
}

/// Parse one binary tier starting at `pos`, appending tokens in source
/// order. Returns the end offset of the parsed text.
fn scan_binary(
    source: &str,
    pos: usize,
    tier: u8,
    depth: usize,
    options: &ParserOptions,
    tokens: &mut Vec<Token>,
) -> Option<usize> {
    let scan_operand = |pos: usize, tokens: &mut Vec<Token>| {
        if tier < TIER_MULTIPLICATIVE {
            scan_binary(source, pos, tier + 1, depth, options, tokens)
        } else {
            scan_unary(source, pos, depth, options, tokens)
        }
    };

    let mut end = scan_operand(pos, tokens)?;
    loop {
        let op_pos = skip_whitespace(source, end);
        let Some((op_len, operator)) = match_operator(source, op_pos, tier) else {
            break;
        };

        let checkpoint = tokens.len();
        push_token(
            tokens,
            source,
            Span::new(op_pos, op_pos + op_len),
            TokenKind::Operator(operator),
        );

        let rhs_pos = skip_whitespace(source, op_pos + op_len);
        match scan_operand(rhs_pos, tokens) {
            Some(rhs_end) => end = rhs_end,
            None => {
                // Dangling operator: give it back
                tokens.truncate(checkpoint);
                break;
            }
        }
    }
    Some(end)
}

/// Unary prefixes: `[not] [-] primary`. A leading `not` glued to `(` is
/// not a prefix at all but a call to a function named `not`, which the
/// primary handles.
fn scan_unary(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
    tokens: &mut Vec<Token>,
) -> Option<usize> {
    let bytes = source.as_bytes();
    let checkpoint = tokens.len();
    let mut cursor = pos;

    if keyword_operator_at(source, cursor, "not") && bytes.get(cursor + 3) != Some(&b'(') {
        push_token(
            tokens,
            source,
            Span::new(cursor, cursor + 3),
            TokenKind::Operator(Operator::Not),
        );
        cursor = skip_whitespace(source, cursor + 3);
    }

    if bytes.get(cursor) == Some(&b'-') {
        push_token(
            tokens,
            source,
            Span::new(cursor, cursor + 1),
            TokenKind::Operator(Operator::Minus),
        );
        cursor = skip_whitespace(source, cursor + 1);
    }

    match scan_primary(source, cursor, depth, options, tokens) {
        Some(end) => Some(end),
        None => {
            tokens.truncate(checkpoint);
            None
        }
    }
}

fn scan_macro(
    source: &str,
    pos: usize,
    options: &ParserOptions,
) -> Option<(usize, TokenKind)> {
    let bytes = source.as_bytes();
    match bytes.get(pos + 1)? {
        b'$' => {
            if !options.user_macros {
                log_debug!(
                    "user macro family disabled",
                    "code" => codes::macros::MACRO_FAMILY_DISABLED.as_str(),
                    "offset" => pos
                );
                return None;
            }
            let (len, value) = user_macro::scan(source, pos)?;
            Some((len, TokenKind::UserMacro(value)))
        }
        b'#' | b'{' => {
            if !options.lld_macros {
                log_debug!(
                    "discovery macro family disabled",
                    "code" => codes::macros::MACRO_FAMILY_DISABLED.as_str(),
                    "offset" => pos
                );
                return None;
            }
            let (len, value) = lld_macro::scan(source, pos)?;
            Some((len, TokenKind::LldMacro(value)))
        }
        b'0'..=b'9' => {
            if !options.collapsed_expression {
                log_debug!(
                    "function-id macro outside collapsed mode",
                    "code" => codes::macros::MACRO_FAMILY_DISABLED.as_str(),
                    "offset" => pos
                );
                return None;
            }
            let (len, value) = function_id_macro::scan(source, pos)?;
            Some((len, TokenKind::FunctionIdMacro(value)))
        }
        b'A'..=b'Z' => {
            let (len, value) = builtin_macro::scan(source, pos)?;
            if !options.builtin_macros.allows(&value.name) {
                log_debug!(
                    "built-in macro not allowed",
                    "code" => codes::macros::BUILTIN_NOT_ALLOWED.as_str(),
                    "name" => value.name
                );
                return None;
            }
            Some((len, TokenKind::BuiltinMacro(value)))
        }
        _ => None,
    }
}

fn scan_primary(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
    tokens: &mut Vec<Token>,
) -> Option<usize> {
    let bytes = source.as_bytes();
    let checkpoint = tokens.len();

    let result = match bytes.get(pos)? {
        b'(' => {
            push_token(
                tokens,
                source,
                Span::new(pos, pos + 1),
                TokenKind::OpenParen,
            );
            let inner_pos = skip_whitespace(source, pos + 1);
            let Some((inner_len, group)) = scan_group(source, inner_pos, depth + 1, options)
            else {
                return none_with_rollback(tokens, checkpoint);
            };
            push_token(
                tokens,
                source,
                group.span,
                TokenKind::ExpressionGroup(group),
            );
            let close = skip_whitespace(source, inner_pos + inner_len);
            if bytes.get(close) != Some(&b')') {
                return none_with_rollback(tokens, checkpoint);
            }
            push_token(
                tokens,
                source,
                Span::new(close, close + 1),
                TokenKind::CloseParen,
            );
            Some(close + 1)
        }
        b'"' => {
            let (len, content) = quoted::scan(source, pos)?;
            push_token(
                tokens,
                source,
                Span::new(pos, pos + len),
                TokenKind::String(content),
            );
            Some(pos + len)
        }
        b'{' => {
            let (len, kind) = scan_macro(source, pos, options)?;
            push_token(tokens, source, Span::new(pos, pos + len), kind);
            Some(pos + len)
        }
        b'0'..=b'9' | b'.' => {
            let (len, literal) = number::scan(source, pos, false)?;
            push_token(
                tokens,
                source,
                Span::new(pos, pos + len),
                TokenKind::Number(literal),
            );
            Some(pos + len)
        }
        b'a'..=b'z' => {
            let (len, parsed) = function::scan(source, pos, depth, options)?;
            let kind = match parsed.kind {
                function::CallKind::History => TokenKind::HistoryFunctionCall(parsed.call),
                function::CallKind::Math => TokenKind::MathFunctionCall(parsed.call),
            };
            push_token(tokens, source, Span::new(pos, pos + len), kind);
            Some(pos + len)
        }
        _ => None,
    };

    if result.is_none() {
        tokens.truncate(checkpoint);
    }
    result
}

fn none_with_rollback(tokens: &mut Vec<Token>, checkpoint: usize) -> Option<usize> {
    tokens.truncate(checkpoint);
    None
}

/// Parse a full expression at `pos`, producing its group. Shared with
/// the function parser for math arguments and with parenthesized
/// sub-expressions; each nesting level bumps `depth`.
pub(crate) fn scan_group(
    source: &str,
    pos: usize,
    depth: usize,
    options: &ParserOptions,
) -> Option<(usize, ExpressionGroup)> {
    if depth >= options.max_depth {
        log_warning!(
            "recursion depth limit reached",
            "code" => codes::expression::DEPTH_LIMIT_REACHED.as_str(),
            "offset" => pos,
            "max_depth" => options.max_depth
        );
        return None;
    }

    let mut tokens = Vec::new();
    let end = scan_binary(source, pos, TIER_OR, depth, options, &mut tokens)?;

    let span = Span::new(pos, end);
    Some((
        end - pos,
        ExpressionGroup {
            span,
            text: span.slice(source).to_string(),
            tokens,
        },
    ))
}

/// Trigger expression parser; one instance per options set, reusable
/// across calls and threads.
#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    options: ParserOptions,
}

impl ExpressionParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a trigger expression at `start`. Leading and trailing
    /// whitespace around a successful parse is part of the match.
    pub fn parse(&self, source: &str, start: usize) -> Outcome<ExpressionGroup> {
        assert!(start <= source.len(), "start offset beyond end of source");

        if source.len() - start > MAX_EXPRESSION_LENGTH {
            log_error!(
                codes::expression::EXPRESSION_TOO_LONG,
                "expression over the length limit",
                "length" => source.len() - start,
                "limit" => MAX_EXPRESSION_LENGTH
            );
            return Outcome::fail(start);
        }

        let expr_pos = skip_whitespace(source, start);
        match scan_group(source, expr_pos, 0, &self.options) {
            Some((len, group)) => {
                let end = skip_whitespace(source, expr_pos + len);
                let outcome = Outcome::matched(source, start, end - start, group);
                match outcome.status {
                    ParseStatus::Success => log_success!(
                        codes::success::EXPRESSION_PARSED,
                        "expression parsed",
                        "length" => outcome.length()
                    ),
                    _ => log_debug!(
                        "parse stopped before the end of input",
                        "code" => codes::expression::PARSE_STOPPED.as_str(),
                        "stopped_at" => end
                    ),
                }
                outcome
            }
            None => {
                log_debug!(
                    "no expression found",
                    "code" => codes::expression::PARSE_FAILED.as_str(),
                    "offset" => start
                );
                Outcome::fail(start)
            }
        }
    }
}
