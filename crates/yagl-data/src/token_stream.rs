//! Lookahead-1 token cursor shared by every record and descriptor parser.

use crate::yagl_lexer::{self, LexError, Located, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("line {line}, col {col}: expected {expected}, found {found}")]
    Structural {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },
    #[error("line {line}, col {col}: value {value:#x} out of range (max {max:#x})")]
    Range {
        line: usize,
        col: usize,
        value: u64,
        max: u64,
    },
    #[error("line {line}, col {col}: unknown {descriptor} '{name}'")]
    UnknownIdentifier {
        line: usize,
        col: usize,
        descriptor: &'static str,
        name: String,
    },
}

pub struct TokenStream {
    tokens: Vec<Located<Token>>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Located<Token>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn from_text(input: &str) -> Result<Self, ParseError> {
        Ok(Self::new(yagl_lexer::lex(input)?))
    }

    fn current(&self) -> Option<&Located<Token>> {
        self.tokens.get(self.pos)
    }

    /// Line and column of the next token.
    pub fn location(&self) -> (usize, usize) {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((0, 0))
    }

    pub fn peek(&self) -> &Token {
        self.current().map(|t| &t.value).unwrap_or(&Token::Eof)
    }

    pub fn at_eof(&self) -> bool {
        *self.peek() == Token::Eof
    }

    pub fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub fn structural(&self, expected: impl Into<String>) -> ParseError {
        let (line, col) = self.location();
        ParseError::Structural {
            line,
            col,
            expected: expected.into(),
            found: self.peek().to_string(),
        }
    }

    pub fn range_error(&self, value: u64, max: u64) -> ParseError {
        let (line, col) = self.location();
        ParseError::Range {
            line,
            col,
            value,
            max,
        }
    }

    pub fn unknown_identifier(&self, descriptor: &'static str, name: &str) -> ParseError {
        let (line, col) = self.location();
        ParseError::UnknownIdentifier {
            line,
            col,
            descriptor,
            name: name.to_string(),
        }
    }

    /// Consume a punctuation or operator token.
    pub fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.peek() == expected {
            self.next();
            Ok(())
        } else {
            Err(self.structural(expected.to_string()))
        }
    }

    /// Consume `expected` if it is next.
    pub fn accept(&mut self, expected: &Token) -> bool {
        let found = self.peek() == expected;
        if found {
            self.next();
        }
        found
    }

    pub fn match_ident(&mut self, name: &str) -> Result<(), ParseError> {
        match self.peek() {
            Token::Ident(s) if s == name => {
                self.next();
                Ok(())
            }
            _ => Err(self.structural(format!("identifier '{name}'"))),
        }
    }

    pub fn ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::Ident(s) => {
                let s = s.clone();
                self.next();
                Ok(s)
            }
            _ => Err(self.structural("identifier")),
        }
    }

    pub fn string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::String(s) => {
                let s = s.clone();
                self.next();
                Ok(s)
            }
            _ => Err(self.structural("string")),
        }
    }

    /// Unsigned integer literal, range-checked against `max`.
    pub fn integer(&mut self, max: u64) -> Result<u64, ParseError> {
        match self.peek().clone() {
            Token::Integer(n) if n <= max => {
                self.next();
                Ok(n)
            }
            Token::Integer(n) => Err(self.range_error(n, max)),
            _ => Err(self.structural("integer")),
        }
    }

    pub fn match_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.integer(u8::MAX.into())? as u8)
    }

    pub fn match_u16(&mut self) -> Result<u16, ParseError> {
        Ok(self.integer(u16::MAX.into())? as u16)
    }

    pub fn match_u32(&mut self) -> Result<u32, ParseError> {
        Ok(self.integer(u32::MAX.into())? as u32)
    }

    /// Optionally negated integer in the `i16` range.
    pub fn match_i16(&mut self) -> Result<i16, ParseError> {
        let negative = self.accept(&Token::Minus);
        let limit = if negative { 0x8000 } else { 0x7FFF };
        let n = self.integer(limit)? as i32;
        let value = if negative { -n } else { n };
        Ok(value as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_expect() {
        let mut ts = TokenStream::from_text("sprite_id: 0x10 {").expect("lex");
        ts.match_ident("sprite_id").expect("ident");
        ts.expect(&Token::Colon).expect("colon");
        assert_eq!(ts.match_u32().expect("u32"), 0x10);
        assert!(!ts.accept(&Token::CloseBrace));
        assert!(ts.accept(&Token::OpenBrace));
        assert!(ts.at_eof());
    }

    #[test]
    fn structural_error_carries_location() {
        let mut ts = TokenStream::from_text("a\n  ;").expect("lex");
        ts.next();
        match ts.expect(&Token::Colon) {
            Err(ParseError::Structural {
                line,
                col,
                expected,
                found,
            }) => {
                assert_eq!((line, col), (2, 3));
                assert_eq!(expected, "':'");
                assert_eq!(found, "';'");
            }
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn range_checks() {
        let mut ts = TokenStream::from_text("0x100 255").expect("lex");
        assert!(matches!(ts.match_u8(), Err(ParseError::Range { value: 0x100, .. })));
        ts.next();
        assert_eq!(ts.match_u8().expect("u8"), 0xFF);
    }

    #[test]
    fn signed_values() {
        let mut ts = TokenStream::from_text("-32768 32767 32768").expect("lex");
        assert_eq!(ts.match_i16().expect("min"), i16::MIN);
        assert_eq!(ts.match_i16().expect("max"), i16::MAX);
        assert!(matches!(ts.match_i16(), Err(ParseError::Range { .. })));
    }
}
