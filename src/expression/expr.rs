//! Expression tree definitions.

use crate::expression::error::ParseError;
use crate::expression::operator::RelOp;
use std::fmt;
use std::mem;
use std::str::FromStr;

/// Atomic filter clause `attribute <op> literal`
///
/// The literal stays unparsed text until it is resolved against the
/// declared type of the attribute's column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub attribute: String,
    pub op: RelOp,
    pub literal: String,
}

impl Predicate {
    pub fn new(attribute: impl Into<String>, op: RelOp, literal: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn negate(self) -> Self {
        Self {
            op: self.op.negate(),
            ..self
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.attribute, self.op, self.literal)
    }
}

/// Discriminant of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Predicate,
    Conjunction,
    Disjunction,
    Negation,
}

/// Boolean expression tree node
///
/// Every child is owned by its parent. Trees produced by the parser are in
/// negation-normal form and never contain a `Negation` node.
///
/// Chains of `&&` and `||` hang off the right child, so a long filter is a
/// deep tree. Traversals walk right children in a loop or keep their own
/// stack, and dropping a tree never recurses.
pub enum Expression {
    Predicate(Predicate),

    Conjunction {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Disjunction {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Negation { child: Box<Expression> },
}

impl Expression {
    /// Create a predicate expression
    pub fn predicate(attribute: impl Into<String>, op: RelOp, literal: impl Into<String>) -> Self {
        Expression::Predicate(Predicate::new(attribute, op, literal))
    }

    /// Create an AND expression
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::Conjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an OR expression
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Disjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a NOT expression without normalizing it
    pub fn negation(child: Expression) -> Self {
        Expression::Negation {
            child: Box::new(child),
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Predicate(_) => ExpressionKind::Predicate,
            Expression::Conjunction { .. } => ExpressionKind::Conjunction,
            Expression::Disjunction { .. } => ExpressionKind::Disjunction,
            Expression::Negation { .. } => ExpressionKind::Negation,
        }
    }

    /// Push a negation through this tree.
    ///
    /// Conjunctions and disjunctions swap via De Morgan, predicates invert
    /// their operator, and a `Negation` wrapper is dropped in favor of its
    /// child. The input tree is consumed.
    pub fn negate(mut self) -> Expression {
        {
            let mut pending: Vec<&mut Expression> = vec![&mut self];

            while let Some(node) = pending.pop() {
                let replacement = match &mut *node {
                    Expression::Predicate(p) => {
                        p.op = p.op.negate();
                        continue;
                    }
                    // negate(!A) is A itself, left untouched
                    Expression::Negation { child } => mem::replace(&mut **child, Expression::leaf()),
                    Expression::Conjunction { left, right } => Expression::Disjunction {
                        left: mem::replace(left, Box::new(Expression::leaf())),
                        right: mem::replace(right, Box::new(Expression::leaf())),
                    },
                    Expression::Disjunction { left, right } => Expression::Conjunction {
                        left: mem::replace(left, Box::new(Expression::leaf())),
                        right: mem::replace(right, Box::new(Expression::leaf())),
                    },
                };
                let descend = matches!(
                    *node,
                    Expression::Conjunction { .. } | Expression::Disjunction { .. }
                );
                *node = replacement;

                if descend {
                    if let Expression::Conjunction { left, right } | Expression::Disjunction { left, right } =
                        node
                    {
                        pending.push(&mut **left);
                        pending.push(&mut **right);
                    }
                }
            }
        }

        self
    }

    /// Whether the tree contains no `Negation` node
    pub fn is_negation_normal(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expression::Predicate(_) => {}
                Expression::Conjunction { left, right } | Expression::Disjunction { left, right } => {
                    pending.push(&**left);
                    pending.push(&**right);
                }
                Expression::Negation { .. } => return false,
            }
        }
        true
    }

    /// All predicates in left-to-right order
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Expression::Predicate(p) => out.push(p),
                Expression::Conjunction { left, right } | Expression::Disjunction { left, right } => {
                    pending.push(&**right);
                    pending.push(&**left);
                }
                Expression::Negation { child } => pending.push(&**child),
            }
        }
        out
    }

    /// Placeholder left behind when a subtree is moved out of its parent
    fn leaf() -> Expression {
        Expression::Predicate(Predicate {
            attribute: String::new(),
            op: RelOp::Eq,
            literal: String::new(),
        })
    }

    /// Move every non-leaf child into `out`, leaving placeholders behind
    fn detach_subtrees(&mut self, out: &mut Vec<Expression>) {
        let mut detach = |slot: &mut Box<Expression>| {
            if !matches!(**slot, Expression::Predicate(_)) {
                out.push(mem::replace(&mut **slot, Expression::leaf()));
            }
        };
        match self {
            Expression::Predicate(_) => {}
            Expression::Conjunction { left, right } | Expression::Disjunction { left, right } => {
                detach(left);
                detach(right);
            }
            Expression::Negation { child } => detach(child),
        }
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_subtrees(&mut pending);
        while let Some(mut node) = pending.pop() {
            // `node` is dropped at the end of the iteration with only leaves below it
            node.detach_subtrees(&mut pending);
        }
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        enum Step {
            And(Expression),
            Or(Expression),
            Not,
        }

        let mut spine = Vec::new();
        let mut node = self;
        let mut tail = loop {
            match node {
                Expression::Predicate(p) => break Expression::Predicate(p.clone()),
                Expression::Conjunction { left, right } => {
                    spine.push(Step::And(left.as_ref().clone()));
                    node = &**right;
                }
                Expression::Disjunction { left, right } => {
                    spine.push(Step::Or(left.as_ref().clone()));
                    node = &**right;
                }
                Expression::Negation { child } => {
                    spine.push(Step::Not);
                    node = &**child;
                }
            }
        };

        while let Some(step) = spine.pop() {
            tail = match step {
                Step::And(left) => Expression::and(left, tail),
                Step::Or(left) => Expression::or(left, tail),
                Step::Not => Expression::negation(tail),
            };
        }
        tail
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Expression::Predicate(a), Expression::Predicate(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Expression::Conjunction { left: l1, right: r1 },
                    Expression::Conjunction { left: l2, right: r2 },
                )
                | (
                    Expression::Disjunction { left: l1, right: r1 },
                    Expression::Disjunction { left: l2, right: r2 },
                ) => {
                    pending.push((&**l1, &**l2));
                    pending.push((&**r1, &**r2));
                }
                (Expression::Negation { child: a }, Expression::Negation { child: b }) => {
                    pending.push((&**a, &**b));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Expression {}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression({})", self)
    }
}

/// Renders filter text that parses back to an equivalent tree
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Frame<'e> {
            Node(&'e Expression),
            Text(&'static str),
        }

        let mut pending = vec![Frame::Node(self)];
        while let Some(frame) = pending.pop() {
            match frame {
                Frame::Text(text) => f.write_str(text)?,
                Frame::Node(Expression::Predicate(p)) => write!(f, "{}", p)?,
                Frame::Node(Expression::Conjunction { left, right }) => pending.extend([
                    Frame::Text(")"),
                    Frame::Node(&**right),
                    Frame::Text(" && "),
                    Frame::Node(&**left),
                    Frame::Text("("),
                ]),
                Frame::Node(Expression::Disjunction { left, right }) => pending.extend([
                    Frame::Text(")"),
                    Frame::Node(&**right),
                    Frame::Text(" || "),
                    Frame::Node(&**left),
                    Frame::Text("("),
                ]),
                Frame::Node(Expression::Negation { child }) => {
                    pending.extend([Frame::Text(")"), Frame::Node(&**child), Frame::Text("!(")])
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::expression::parser::parse(s)
    }
}
