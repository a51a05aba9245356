//! Expression evaluation against raw records.

use crate::catalog::SchemaSnapshot;
use crate::expression::error::{EvalError, EvalResult};
use crate::expression::expr::{Expression, Predicate};

/// Evaluates filters against records laid out by one schema snapshot
///
/// The evaluator only reads the tree, the schema and the record, so one
/// instance can be shared across threads.
pub struct ExpressionEvaluator<'a> {
    schema: &'a SchemaSnapshot,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(schema: &'a SchemaSnapshot) -> Self {
        Self { schema }
    }

    /// Evaluate an expression against a raw record
    ///
    /// Conjunctions and disjunctions short-circuit left to right. Right
    /// children and negations are followed in a loop, so only left children
    /// cost stack depth; the parser bounds that by its nesting limit.
    ///
    /// # Panics
    ///
    /// Panics if a predicate names an attribute missing from the schema.
    /// Use [`ExpressionEvaluator::validate`] first when the filter comes
    /// from an untrusted source.
    pub fn evaluate(&self, expr: &Expression, record: &[u8]) -> EvalResult<bool> {
        let mut node = expr;
        let mut negated = false;

        loop {
            match node {
                Expression::Predicate(predicate) => {
                    return Ok(self.evaluate_predicate(predicate, record)? != negated);
                }
                Expression::Conjunction { left, right } => {
                    if !self.evaluate(left, record)? {
                        return Ok(negated);
                    }
                    node = &**right;
                }
                Expression::Disjunction { left, right } => {
                    if self.evaluate(left, record)? {
                        return Ok(!negated);
                    }
                    node = &**right;
                }
                // Parsed trees never get here; hand-built ones still evaluate correctly.
                Expression::Negation { child } => {
                    negated = !negated;
                    node = &**child;
                }
            }
        }
    }

    /// Check that every predicate names a known attribute and carries a
    /// literal of the attribute's type
    pub fn validate(&self, expr: &Expression) -> EvalResult<()> {
        for predicate in expr.predicates() {
            let Some(index) = self.schema.column_index(&predicate.attribute) else {
                return Err(EvalError::UnknownAttribute {
                    attribute: predicate.attribute.clone(),
                });
            };
            self.encode_literal(predicate, index)?;
        }
        Ok(())
    }

    fn evaluate_predicate(&self, predicate: &Predicate, record: &[u8]) -> EvalResult<bool> {
        let index = self
            .schema
            .column_index(&predicate.attribute)
            .unwrap_or_else(|| panic!("Unknown attribute {} in filter", predicate.attribute));
        let literal = self.encode_literal(predicate, index)?;
        let value = self.schema.get(record, index);
        Ok(predicate.op.matches(value.compare_bytes(&literal)))
    }

    fn encode_literal(&self, predicate: &Predicate, index: usize) -> EvalResult<Vec<u8>> {
        let column_type = self.schema.column(index).column_type;
        column_type
            .parse_literal(&predicate.literal)
            .map_err(|e| EvalError::InvalidLiteral {
                attribute: predicate.attribute.clone(),
                literal: predicate.literal.clone(),
                column_type,
                reason: e.to_string(),
            })
    }
}

/// Evaluate `expr` against `record` as laid out by `schema`
pub fn evaluate(expr: &Expression, record: &[u8], schema: &SchemaSnapshot) -> EvalResult<bool> {
    ExpressionEvaluator::new(schema).evaluate(expr, record)
}
