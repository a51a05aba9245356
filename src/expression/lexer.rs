// Filter lexer - tokenizes boolean filter expressions

use super::error::{ParseError, ParseResult};
use super::token::{Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Byte offset of the cursor
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.advance() else {
            return Ok(Token::end());
        };

        let token = match c {
            b'|' => {
                if self.advance() != Some(b'|') {
                    return Err(ParseError::InvalidToken {
                        found: '|',
                        expected: "||",
                        position: start,
                    });
                }
                Token::new(TokenKind::Or, "||")
            }
            b'&' => {
                if self.advance() != Some(b'&') {
                    return Err(ParseError::InvalidToken {
                        found: '&',
                        expected: "&&",
                        position: start,
                    });
                }
                Token::new(TokenKind::And, "&&")
            }
            b'!' => self.read_bang(),
            b'(' => Token::new(TokenKind::Left, "("),
            b')' => Token::new(TokenKind::Right, ")"),
            b'=' => {
                if self.advance() != Some(b'=') {
                    return Err(ParseError::InvalidToken {
                        found: '=',
                        expected: "==",
                        position: start,
                    });
                }
                Token::new(TokenKind::Operator, "==")
            }
            b'<' => {
                if self.eat(b'=') {
                    Token::new(TokenKind::Operator, "<=")
                } else {
                    Token::new(TokenKind::Operator, "<")
                }
            }
            b'>' => {
                if self.eat(b'=') {
                    Token::new(TokenKind::Operator, ">=")
                } else {
                    Token::new(TokenKind::Operator, ">")
                }
            }
            c if is_operand_byte(c) => {
                self.position = start;
                self.read_operand()
            }
            _ => {
                let found = self.input[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(ParseError::InvalidOperand {
                    found,
                    position: start,
                });
            }
        };

        Ok(token)
    }

    /// Look at the next token without consuming it
    pub fn peek_token(&mut self) -> ParseResult<Token> {
        let token = self.next_token()?;
        self.put_back(&token);
        Ok(token)
    }

    /// Rewind the cursor over a token returned by `next_token`
    pub fn put_back(&mut self, token: &Token) {
        self.position -= token.text.len();
    }

    /// Tokenize the remaining input, ending with an `End` token
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::End;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// `!=`, `!in` followed by whitespace, or a bare `!`
    fn read_bang(&mut self) -> Token {
        let after_bang = self.position;
        match self.advance() {
            Some(b'=') => return Token::new(TokenKind::Operator, "!="),
            Some(b'i') => {
                if self.advance() == Some(b'n')
                    && self.peek().is_some_and(|c| c.is_ascii_whitespace())
                {
                    return Token::new(TokenKind::Operator, "!in");
                }
            }
            _ => {}
        }
        // Only the `!` is consumed; whatever followed is lexed again.
        self.position = after_bang;
        Token::new(TokenKind::Not, "!")
    }

    fn read_operand(&mut self) -> Token {
        let start = self.position;
        while self.peek().is_some_and(is_operand_byte) {
            self.position += 1;
        }
        Token::new(TokenKind::Operand, &self.input[start..self.position])
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.position += 1;
        }
    }
}

fn is_operand_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'.' | b'_' | b'-')
}
