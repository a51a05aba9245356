// Filter tokens for lexical analysis

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    End,
    Or,
    And,
    Not,
    Left,
    Right,
    Operator,
    Operand,
}

/// A classified slice of filter text
///
/// `text` is the literal spelling consumed from the input, which is what
/// the lexer rewinds by when a token is put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn end() -> Self {
        Self::new(TokenKind::End, "")
    }

    /// Human-readable form for diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            _ => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(Token::end().describe(), "end of input");
        assert_eq!(Token::new(TokenKind::Operand, "abc").describe(), "abc");
        assert_eq!(Token::new(TokenKind::Or, "||").describe(), "||");
    }
}
