//! Leaf parsers shared by the query, function, and expression engines
//!
//! Each primitive pairs a crate-internal `scan` function with a small
//! public parser type. `scan` either claims a run of characters and
//! returns its decoded payload or declines without consuming anything;
//! the public wrapper turns that into the three-valued outcome.

pub mod builtin_macro;
pub mod function_id_macro;
pub mod lld_macro;
pub mod number;
pub mod quoted;
pub mod user_macro;

pub use builtin_macro::{BuiltinMacro, BuiltinMacroParser};
pub use function_id_macro::{FunctionIdMacro, FunctionIdMacroParser};
pub use lld_macro::{LldFunction, LldMacro, LldMacroParser};
pub use number::{NumberLiteral, NumberParser};
pub use quoted::QuotedStringParser;
pub use user_macro::{UserMacro, UserMacroParser};
