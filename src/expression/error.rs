//! Error types for filter parsing and evaluation.

use crate::access::ColumnType;
use thiserror::Error;

/// Errors raised while lexing or parsing a filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid token starting with {found} at position {position}; did you mean {expected}?")]
    InvalidToken {
        found: char,
        expected: &'static str,
        position: usize,
    },

    #[error("All operands must conform to [a-zA-Z0-9._-]+, found '{found}' at position {position}")]
    InvalidOperand { found: char, position: usize },

    #[error("Could not find matching right parenthesis")]
    UnmatchedParenthesis,

    #[error("First operand must be followed by operator in all predicates (after '{attribute}')")]
    MissingOperator { attribute: String },

    #[error("Operator must be followed by operand in all predicates (after '{attribute}{operator}')")]
    MissingOperand { attribute: String, operator: String },

    #[error("Unsupported operator {operator}")]
    UnsupportedOperator { operator: String },

    #[error("Unexpected token {token}")]
    UnexpectedToken { token: String },

    #[error("Parsing ended prematurely at {token}")]
    EndedPrematurely { token: String },

    #[error("Parentheses nest deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Result type for filter parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while evaluating a filter against a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Unknown attribute {attribute}")]
    UnknownAttribute { attribute: String },

    #[error("Invalid literal '{literal}' for attribute {attribute} of type {column_type}: {reason}")]
    InvalidLiteral {
        attribute: String,
        literal: String,
        column_type: ColumnType,
        reason: String,
    },
}

/// Result type for filter evaluation
pub type EvalResult<T> = Result<T, EvalError>;
