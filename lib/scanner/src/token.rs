use std::fmt::Display;

use cursor::{Col, Line, Offset, SourceRange};
use strum_macros::EnumDiscriminants;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub range: SourceRange<'a>,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, range: impl Into<SourceRange<'a>>) -> Token<'a> {
        Self { data, range: range.into() }
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from(&self.data)
    }

    pub fn lexeme(&self) -> &'a str {
        self.range.lexeme()
    }

    pub fn line(&self) -> Line {
        self.range.line()
    }

    pub fn col(&self) -> Col {
        self.range.col()
    }

    pub fn offset(&self) -> Offset {
        self.range.offset()
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.data {
            TokenData::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.lexeme()),
        }
    }
}

/// Token payload. [`TokenKind`] is the derived data-free mirror the parser
/// matches against when it only cares about the kind of token.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenKind))]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens. A lone `!` is not a token of the
    // language (there is `!=` but no unary `!`).
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    Str(&'a str),
    Number(f64),

    // Keywords.
    False,
    Nil,
    Print,
    True,

    Eof,
}
