//! Boolean filter expressions over record attributes.
//!
//! This module provides:
//! - Lexing of filter text into classified tokens
//! - Recursive-descent parsing into an expression tree
//! - Negation normalization applied while parsing (De Morgan, operator inversion)
//! - Evaluation of normalized trees against raw records

pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod operator;
pub mod parser;
pub mod token;

pub use error::{EvalError, EvalResult, ParseError, ParseResult};
pub use eval::{evaluate, ExpressionEvaluator};
pub use expr::{Expression, ExpressionKind, Predicate};
pub use lexer::Lexer;
pub use operator::RelOp;
pub use parser::{parse, Parser, MAX_NESTING_DEPTH};
pub use token::{Token, TokenKind};
