// Filter parser - converts filter text into a negation-normal expression tree
//
// expr   := term ( '||' term )*      folded to the right
// term   := factor ( '&&' factor )*  folded to the right
// factor := '!'* ( '(' expr ')' | OPERAND OPERATOR OPERAND )

use super::error::{ParseError, ParseResult};
use super::expr::{Expression, Predicate};
use super::lexer::Lexer;
use super::operator::RelOp;
use super::token::TokenKind;
use log::debug;

/// Deepest parenthesis nesting a filter may use
pub const MAX_NESTING_DEPTH: usize = 128;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            depth: 0,
        }
    }

    /// Parse the whole input into a single expression
    pub fn parse(mut self) -> ParseResult<Expression> {
        let expr = self.parse_expr()?;

        let trailing = self.lexer.next_token()?;
        if trailing.kind != TokenKind::End {
            return Err(ParseError::EndedPrematurely {
                token: trailing.describe(),
            });
        }

        debug_assert!(expr.is_negation_normal());
        debug!("Parsed filter into {}", expr);
        Ok(expr)
    }

    /// Disjunctions (right-associative)
    fn parse_expr(&mut self) -> ParseResult<Expression> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();
        while self.lexer.peek_token()?.kind == TokenKind::Or {
            self.lexer.next_token()?;
            rest.push(self.parse_term()?);
        }
        Ok(fold_right(first, rest, Expression::or))
    }

    /// Conjunctions (right-associative)
    fn parse_term(&mut self) -> ParseResult<Expression> {
        let first = self.parse_factor()?;
        let mut rest = Vec::new();
        while self.lexer.peek_token()?.kind == TokenKind::And {
            self.lexer.next_token()?;
            rest.push(self.parse_factor()?);
        }
        Ok(fold_right(first, rest, Expression::and))
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        // A run of `!` collapses to its parity
        let mut negated = false;
        let mut token = self.lexer.next_token()?;
        while token.kind == TokenKind::Not {
            negated = !negated;
            token = self.lexer.next_token()?;
        }

        let expr = match token.kind {
            TokenKind::Left => self.parse_group()?,
            TokenKind::Operand => self.parse_predicate(token.text)?,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    token: token.describe(),
                })
            }
        };

        // Normalize immediately so no Negation node survives
        Ok(if negated { expr.negate() } else { expr })
    }

    /// Parenthesized expression, after the opening `(`
    fn parse_group(&mut self) -> ParseResult<Expression> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        self.depth += 1;
        let expr = self.parse_expr()?;
        self.depth -= 1;

        if self.lexer.next_token()?.kind != TokenKind::Right {
            return Err(ParseError::UnmatchedParenthesis);
        }
        Ok(expr)
    }

    fn parse_predicate(&mut self, attribute: String) -> ParseResult<Expression> {
        let op = self.lexer.next_token()?;
        if op.kind != TokenKind::Operator {
            return Err(ParseError::MissingOperator { attribute });
        }
        let rel_op: RelOp = op.text.parse()?;

        let operand = self.lexer.next_token()?;
        if operand.kind != TokenKind::Operand {
            return Err(ParseError::MissingOperand {
                attribute,
                operator: op.text,
            });
        }

        Ok(Expression::Predicate(Predicate::new(
            attribute,
            rel_op,
            operand.text,
        )))
    }
}

/// `first op (rest[0] op (rest[1] op ...))`
fn fold_right(
    first: Expression,
    mut rest: Vec<Expression>,
    join: fn(Expression, Expression) -> Expression,
) -> Expression {
    let Some(mut acc) = rest.pop() else {
        return first;
    };
    while let Some(prev) = rest.pop() {
        acc = join(prev, acc);
    }
    join(first, acc)
}

/// Parse filter text into a negation-normal expression tree
pub fn parse(input: &str) -> ParseResult<Expression> {
    Parser::new(input).parse()
}
