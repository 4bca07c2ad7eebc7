//! Token model for parsed expressions
//!
//! Every token carries its span and the exact text it matched; nested
//! structures (function parameters, parenthesized groups) embed their own
//! token lists verbatim, so the tree and the flat stream describe the
//! same contiguous source ranges.

use crate::function::period::Period;
use crate::primitives::{BuiltinMacro, FunctionIdMacro, LldMacro, NumberLiteral, UserMacro};
use crate::query::QueryTarget;
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Binary and unary operators, loosest first within the binary tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Or,
    And,
    Not,
    Equal,
    NotEqual,
    Less,
    Greater,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
            Operator::Not => "not",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Binding strength of the binary form, loosest = 0; `Not` only
    /// occurs as a prefix and reports the tightest tier.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 0,
            Operator::And => 1,
            Operator::Equal | Operator::NotEqual | Operator::Less | Operator::Greater => 2,
            Operator::Plus | Operator::Minus => 3,
            Operator::Multiply | Operator::Divide => 4,
            Operator::Not => 5,
        }
    }
}

/// One function argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub span: Span,
    pub text: String,
    pub kind: ParameterKind,
}

/// Payload of a function argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterKind {
    Query(QueryTarget),
    Period(Period),
    Quoted(String),
    Unquoted(String),
    /// Math functions only: a fully parsed sub-expression
    Expression(ExpressionGroup),
}

/// A parsed function call; whether it used the history or the math
/// argument grammar is recorded by the enclosing token kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// An ordered token list plus the substring it was parsed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionGroup {
    pub span: Span,
    pub text: String,
    pub tokens: Vec<Token>,
}

/// Kind-specific token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Number(NumberLiteral),
    String(String),
    UserMacro(UserMacro),
    LldMacro(LldMacro),
    BuiltinMacro(BuiltinMacro),
    FunctionIdMacro(FunctionIdMacro),
    Operator(Operator),
    OpenParen,
    CloseParen,
    HistoryFunctionCall(FunctionCall),
    MathFunctionCall(FunctionCall),
    ExpressionGroup(ExpressionGroup),
}

/// One positioned token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub span: Span,
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub(crate) fn new(source: &str, span: Span, kind: TokenKind) -> Self {
        Self {
            span,
            text: span.slice(source).to_string(),
            kind,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, TokenKind::Operator(_))
    }

    pub fn is_function_call(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::HistoryFunctionCall(_) | TokenKind::MathFunctionCall(_)
        )
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            TokenKind::HistoryFunctionCall(call) | TokenKind::MathFunctionCall(call) => Some(call),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence_ordering() {
        assert!(Operator::Or.precedence() < Operator::And.precedence());
        assert!(Operator::And.precedence() < Operator::Equal.precedence());
        assert!(Operator::Equal.precedence() < Operator::Plus.precedence());
        assert!(Operator::Plus.precedence() < Operator::Multiply.precedence());
        assert!(Operator::Multiply.precedence() < Operator::Not.precedence());
    }

    #[test]
    fn test_token_text_matches_span() {
        let source = "1 + 2";
        let token = Token::new(
            source,
            Span::new(4, 5),
            TokenKind::Number(NumberLiteral {
                value: 2.0,
                suffix: None,
            }),
        );

        assert_eq!(token.text, "2");
        assert_eq!(token.span.len(), token.text.len());
    }
}
