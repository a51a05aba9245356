//! Relational operators used in predicates.

use crate::expression::error::ParseError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Relational operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl RelOp {
    pub const ALL: [RelOp; 6] = [
        RelOp::Eq,
        RelOp::Neq,
        RelOp::Lt,
        RelOp::Gt,
        RelOp::Le,
        RelOp::Ge,
    ];

    /// Get the filter-language spelling of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Neq => "!=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        }
    }

    /// The operator accepting exactly the complement of this one
    pub fn negate(self) -> RelOp {
        match self {
            RelOp::Eq => RelOp::Neq,
            RelOp::Neq => RelOp::Eq,
            RelOp::Lt => RelOp::Ge,
            RelOp::Ge => RelOp::Lt,
            RelOp::Gt => RelOp::Le,
            RelOp::Le => RelOp::Gt,
        }
    }

    /// Whether `left <op> right` holds given `left.cmp(right)`
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            RelOp::Eq => ordering == Ordering::Equal,
            RelOp::Neq => ordering != Ordering::Equal,
            RelOp::Lt => ordering == Ordering::Less,
            RelOp::Gt => ordering == Ordering::Greater,
            RelOp::Le => ordering != Ordering::Greater,
            RelOp::Ge => ordering != Ordering::Less,
        }
    }
}

impl FromStr for RelOp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseError::UnsupportedOperator {
                operator: s.to_string(),
            })
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
