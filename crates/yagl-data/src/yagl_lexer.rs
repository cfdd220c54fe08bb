//! Tokenizer for the YAGL text language.
//!
//! Integer literals go through small `winnow` parsers; everything else is a
//! single forward scan that tracks line and column for diagnostics.

use std::fmt;
use winnow::Parser;
use winnow::ascii::{digit1, hex_digit1};
use winnow::combinator::{alt, preceded};
use winnow::error::ModalResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Integer(u64),
    String(String),

    // Punctuation
    Colon,
    SemiColon,
    Comma,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenAngle,
    CloseAngle,
    Equals,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    ShiftLeft,

    Eof,
}

impl Token {
    /// Source text of punctuation and operator tokens.
    pub fn symbol(&self) -> Option<&'static str> {
        let s = match self {
            Token::Colon => ":",
            Token::SemiColon => ";",
            Token::Comma => ",",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenAngle => "<",
            Token::CloseAngle => ">",
            Token::Equals => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::ShiftLeft => "<<",
            _ => return None,
        };
        Some(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier '{s}'"),
            Token::Integer(n) => write!(f, "integer {n:#x}"),
            Token::String(s) => write!(f, "string {s:?}"),
            Token::Eof => write!(f, "end of input"),
            other => write!(f, "'{}'", other.symbol().unwrap_or("?")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Located<T> {
    pub value: T,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("line {line}, col {col}: {msg}")]
    Error {
        line: usize,
        col: usize,
        msg: String,
    },
}

fn hex_literal(input: &mut &str) -> ModalResult<u64> {
    preceded(alt(("0x", "0X")), hex_digit1)
        .try_map(|digits: &str| u64::from_str_radix(digits, 16))
        .parse_next(input)
}

fn dec_literal(input: &mut &str) -> ModalResult<u64> {
    digit1
        .try_map(|digits: &str| digits.parse::<u64>())
        .parse_next(input)
}

fn integer_literal(input: &mut &str) -> ModalResult<u64> {
    alt((hex_literal, dec_literal)).parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scanner state. Positions are byte offsets into `input`; only ASCII is
/// meaningful outside string literals so columns count chars.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn error(&self, line: usize, col: usize, msg: impl Into<String>) -> LexError {
        LexError::Error {
            line,
            col,
            msg: msg.into(),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, line: usize, col: usize) -> Result<(), LexError> {
        // Opening "/*" already consumed.
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error(line, col, "unterminated block comment")),
            }
        }
    }

    fn lex_integer(&mut self, line: usize, col: usize) -> Result<Token, LexError> {
        let mut rest = self.rest();
        let value = integer_literal
            .parse_next(&mut rest)
            .map_err(|_| self.error(line, col, "integer literal out of range"))?;
        let consumed = self.rest().len() - rest.len();
        for _ in 0..consumed {
            self.bump();
        }
        if self.peek().is_some_and(is_ident_char) {
            return Err(self.error(line, col, "malformed integer literal"));
        }
        Ok(Token::Integer(value))
    }

    /// Strings are byte strings: each char of the token is one byte. Raw
    /// text must be ASCII, higher bytes are only reachable through `\xNN`.
    fn lex_string(&mut self, line: usize, col: usize) -> Result<Token, LexError> {
        // Opening quote already consumed.
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(s)),
                Some('\\') => match self.bump() {
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some('n') => s.push('\n'),
                    Some('x') => {
                        let hex: String = [self.bump(), self.bump()].into_iter().flatten().collect();
                        let byte = u8::from_str_radix(&hex, 16)
                            .map_err(|_| self.error(line, col, format!("bad escape \\x{hex}")))?;
                        s.push(char::from(byte));
                    }
                    Some(c) => return Err(self.error(line, col, format!("unknown escape \\{c}"))),
                    None => return Err(self.error(line, col, "unterminated string")),
                },
                Some('\n') | None => return Err(self.error(line, col, "unterminated string")),
                Some(c) if !c.is_ascii() => {
                    return Err(self.error(line, col, format!("non-ASCII '{c}' in string, write bytes as \\xNN")));
                }
                Some(c) => s.push(c),
            }
        }
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        Token::Ident(self.input[start..self.pos].to_string())
    }

    fn lex_punct(&mut self, c: char) -> Option<Token> {
        let tok = match c {
            ':' => Token::Colon,
            ';' => Token::SemiColon,
            ',' => Token::Comma,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '>' => Token::CloseAngle,
            '=' => Token::Equals,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '&' => Token::Ampersand,
            '|' => Token::Pipe,
            '<' => {
                if self.peek2() == Some('<') {
                    self.bump();
                    Token::ShiftLeft
                } else {
                    Token::OpenAngle
                }
            }
            _ => return None,
        };
        self.bump();
        Some(tok)
    }
}

pub fn lex(input: &str) -> Result<Vec<Located<Token>>, LexError> {
    let mut lx = Lexer {
        input,
        pos: 0,
        line: 1,
        col: 1,
    };
    let mut tokens = Vec::new();

    while let Some(ch) = lx.peek() {
        let line = lx.line;
        let col = lx.col;

        if ch.is_whitespace() {
            lx.bump();
            continue;
        }

        // Comments
        if ch == '/' && lx.peek2() == Some('/') {
            lx.skip_line_comment();
            continue;
        }
        if ch == '/' && lx.peek2() == Some('*') {
            lx.bump();
            lx.bump();
            lx.skip_block_comment(line, col)?;
            continue;
        }

        let value = if ch.is_ascii_digit() {
            lx.lex_integer(line, col)?
        } else if ch == '"' {
            lx.bump();
            lx.lex_string(line, col)?
        } else if is_ident_start(ch) {
            lx.lex_ident()
        } else if let Some(tok) = lx.lex_punct(ch) {
            tok
        } else {
            return Err(lx.error(line, col, format!("unexpected character '{ch}'")));
        };

        tokens.push(Located { value, line, col });
    }

    tokens.push(Located {
        value: Token::Eof,
        line: lx.line,
        col: lx.col,
    });
    Ok(tokens)
}
