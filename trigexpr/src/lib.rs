// Internal modules
pub mod config;
pub mod error;
pub mod expression;
pub mod function;
#[macro_use]
pub mod logging;
pub mod outcome;
pub mod primitives;
pub mod query;
pub mod utils;

// Re-export key types for library consumers
pub use config::{BuiltinMacros, ParserOptions};
pub use error::ConfigError;
pub use expression::{ExpressionGroup, ExpressionParser, Operator, Token, TokenKind};
pub use function::{FunctionParser, ParsedCall, PeriodParser};
pub use outcome::{Outcome, ParseStatus};
pub use query::{MetricQueryParser, QueryTarget};
pub use utils::Span;
