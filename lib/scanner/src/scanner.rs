use cursor::Cursor;
use errors::LoxError;

pub mod token;
pub use token::{Token, TokenKind};
use token::TokenData::{self, *};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string: {0}")]
    UnterminatedString(String),
    #[error("Malformed number literal (leading zero): {0}")]
    MalformedNumber(String),
}

/// Lazily scans a source buffer into tokens.
///
/// Yields one `Err` per offending lexeme (positioned, as [`LoxError`]) and
/// keeps scanning afterwards, so the parser can report every lexical error
/// in a program in one pass. The stream ends with a single `Eof` token.
#[derive(Debug)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    eof_emitted: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), eof_emitted: false }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.next();
                }
                Some('/') if self.cursor.peek_next() == Some('/') => {
                    while !matches!(self.cursor.peek(), Some('\n') | None) {
                        self.cursor.next();
                    }
                }
                _ => return,
            }
        }
    }

    fn consume_if_matches(&mut self, expected: char) -> bool {
        match self.cursor.peek() {
            Some(c) if c == expected => {
                self.cursor.next();
                true
            }
            _ => false,
        }
    }

    fn string(&mut self) -> Result<TokenData<'a>, ScanError> {
        let content_start = self.cursor.clone();
        loop {
            match self.cursor.peek() {
                Some('"') => {
                    let content = content_start.slice_until(&self.cursor);
                    self.cursor.next();
                    return Ok(Str(content));
                }
                Some(_) => {
                    self.cursor.next();
                }
                None => {
                    return Err(ScanError::UnterminatedString(
                        content_start.slice_until(&self.cursor).to_string(),
                    ))
                }
            }
        }
    }

    fn number(&mut self, start: &Cursor<'a>, first_digit: char) -> Result<TokenData<'a>, ScanError> {
        // `0` must stand alone: `007` is a malformed literal, not `0` `0` `7`.
        let leading_zero = first_digit == '0' && matches!(self.cursor.peek(), Some('0'..='9'));

        while matches!(self.cursor.peek(), Some('0'..='9')) {
            self.cursor.next();
        }

        // Only consume the dot when a fraction follows, so `1.` stays
        // `1` `.` and can still start a member access.
        if self.cursor.peek() == Some('.') && matches!(self.cursor.peek_next(), Some('0'..='9')) {
            self.cursor.next();
            while matches!(self.cursor.peek(), Some('0'..='9')) {
                self.cursor.next();
            }
        }

        let lexeme = start.slice_until(&self.cursor);
        if leading_zero {
            return Err(ScanError::MalformedNumber(lexeme.to_string()));
        }
        Ok(Number(lexeme.parse().expect("digit-and-dot lexemes always parse as f64")))
    }

    fn identifier_or_keyword(&mut self, start: &Cursor<'a>) -> TokenData<'a> {
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.cursor.next();
        }

        match start.slice_until(&self.cursor) {
            "true" => True,
            "false" => False,
            "nil" => Nil,
            "print" => Print,
            _ => Identifier,
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = errors::Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_emitted {
            return None;
        }

        self.skip_whitespace_and_comments();

        let start = self.cursor.clone();
        let Some(c) = self.cursor.next() else {
            self.eof_emitted = true;
            return Some(Ok(Token::new(Eof, (start.clone(), start))));
        };

        let data = match c {
            '(' => Ok(LeftParen),
            ')' => Ok(RightParen),
            ',' => Ok(Comma),
            '.' => Ok(Dot),
            '-' => Ok(Minus),
            '+' => Ok(Plus),
            ';' => Ok(Semicolon),
            '*' => Ok(Star),
            // `//` comments were already skipped above
            '/' => Ok(Slash),

            '=' => Ok(if self.consume_if_matches('=') { EqualEqual } else { Equal }),
            '>' => Ok(if self.consume_if_matches('=') { GreaterEqual } else { Greater }),
            '<' => Ok(if self.consume_if_matches('=') { LessEqual } else { Less }),
            '!' if self.consume_if_matches('=') => Ok(BangEqual),

            '"' => self.string(),
            '0'..='9' => self.number(&start, c),
            'a'..='z' | '_' => Ok(self.identifier_or_keyword(&start)),

            c => Err(ScanError::UnexpectedCharacter(c)),
        };

        Some(match data {
            Ok(data) => Ok(Token::new(data, (start, self.cursor.clone()))),
            Err(e) => Err(LoxError { line: start.line(), col: start.col(), message: e.to_string() }),
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(source: &str) -> Vec<(TokenData, &str)> {
        TokenStream::new(source)
            .map(|t| t.unwrap())
            .map(|t| (t.data.clone(), t.lexeme()))
            .collect_vec()
    }

    fn scan_errors(source: &str) -> Vec<String> {
        TokenStream::new(source).filter_map(|t| t.err()).map(|e| e.message).collect_vec()
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            scan("=(),.-+;*/<>"),
            vec![
                (Equal, "="),
                (LeftParen, "("),
                (RightParen, ")"),
                (Comma, ","),
                (Dot, "."),
                (Minus, "-"),
                (Plus, "+"),
                (Semicolon, ";"),
                (Star, "*"),
                (Slash, "/"),
                (Less, "<"),
                (Greater, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn two_char_tokens_win_over_prefixes() {
        assert_eq!(
            scan("!= = == < <= > >="),
            vec![
                (BangEqual, "!="),
                (Equal, "="),
                (EqualEqual, "=="),
                (Less, "<"),
                (LessEqual, "<="),
                (Greater, ">"),
                (GreaterEqual, ">="),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn lone_bang_is_an_error() {
        assert_eq!(scan_errors("!"), vec![ScanError::UnexpectedCharacter('!').to_string()]);
    }

    #[test]
    fn keywords_before_identifiers() {
        assert_eq!(
            scan("true false nil print truthy nilly print_x _ok"),
            vec![
                (True, "true"),
                (False, "false"),
                (Nil, "nil"),
                (Print, "print"),
                (Identifier, "truthy"),
                (Identifier, "nilly"),
                (Identifier, "print_x"),
                (Identifier, "_ok"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn identifiers_must_start_lowercase() {
        // Upper-case letters are fine after the first char but can't start
        // an identifier.
        assert_eq!(scan("aB_9"), vec![(Identifier, "aB_9"), (Eof, "")]);
        assert_eq!(scan_errors("Ab"), vec![ScanError::UnexpectedCharacter('A').to_string()]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            scan("0 7 42 3.14 0.5"),
            vec![
                (Number(0.0), "0"),
                (Number(7.0), "7"),
                (Number(42.0), "42"),
                (Number(3.14), "3.14"),
                (Number(0.5), "0.5"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn number_without_fraction_leaves_the_dot() {
        assert_eq!(scan("1.x"), vec![(Number(1.0), "1"), (Dot, "."), (Identifier, "x"), (Eof, "")]);
    }

    #[test]
    fn leading_zeros_are_rejected() {
        for source in ["00", "01", "007", "00.5"] {
            assert_eq!(
                scan_errors(source),
                vec![ScanError::MalformedNumber(source.to_string()).to_string()],
                "scanning {source:?}"
            );
        }
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan("\"hello world\" \"\""),
            vec![
                (Str("hello world"), "\"hello world\""),
                (Str(""), "\"\""),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn strings_may_span_newlines() {
        // Only end of input makes a string unterminated.
        assert_eq!(scan("\"a\nb\""), vec![(Str("a\nb"), "\"a\nb\""), (Eof, "")]);
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            scan_errors("\"hello"),
            vec![ScanError::UnterminatedString("hello".to_string()).to_string()]
        );
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(
            scan("a // comment ;()\nb // to the very end"),
            vec![(Identifier, "a"), (Identifier, "b"), (Eof, "")]
        );
        assert_eq!(scan("  \t\r\n  "), vec![(Eof, "")]);
    }

    #[test]
    fn scanning_continues_after_an_error() {
        let (tokens, errors): (Vec<_>, Vec<_>) =
            TokenStream::new("a @ b").partition_map(|t| match t {
                Ok(t) => itertools::Either::Left((t.data.clone(), t.lexeme().to_string())),
                Err(e) => itertools::Either::Right(e.message),
            });
        assert_eq!(errors, vec![ScanError::UnexpectedCharacter('@').to_string()]);
        assert_eq!(
            tokens,
            vec![
                (Identifier, "a".to_string()),
                (Identifier, "b".to_string()),
                (Eof, "".to_string()),
            ]
        );
    }

    #[test]
    fn error_positions() {
        let errors = TokenStream::new("x;\n  #").filter_map(|t| t.err()).collect_vec();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            format!("error (l. 2, c. 3): {}", ScanError::UnexpectedCharacter('#'))
        );
    }
}
