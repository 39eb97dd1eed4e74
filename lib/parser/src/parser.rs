mod expr;
mod stmt;

use std::{cell::RefCell, iter::Peekable};

use errors::{LoxError, LoxErrors, Result};
pub use expr::{Expr, LiteralValue};
use scanner::{token::TokenData, Token, TokenKind, TokenStream};
pub use stmt::Stmt;

use TokenKind::*;

#[derive(Debug)]
pub struct ParserError<'a> {
    error: ParserErrorType,
    token: Token<'a>,
}

impl<'a> From<ParserError<'a>> for LoxError {
    fn from(error: ParserError<'a>) -> Self {
        LoxError {
            line: error.token.line(),
            col: error.token.col(),
            message: format!("{} (found {})", error.error, error.token),
        }
    }
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { token, error }
    }
}

#[derive(Debug)]
pub enum ParserErrorType {
    MissingRightParen,
    ExpectedPrimaryExpression,
    ExpectedSemicolon,
    ExpectedPropertyName,
    InvalidAssignmentTarget,
}

impl std::fmt::Display for ParserErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParserErrorType::MissingRightParen => "Missing closing `)` after expression",
                ParserErrorType::ExpectedPrimaryExpression => "Expected primary expression",
                ParserErrorType::ExpectedSemicolon => "Expected semicolon after expression",
                ParserErrorType::ExpectedPropertyName => "Expected property name after `.`",
                ParserErrorType::InvalidAssignmentTarget => "Invalid assignment target",
            }
        )
    }
}

/// Recursive-descent parser over the lazy token stream.
///
/// Precedence, low to high: assignment (right-associative), equality,
/// comparison, term (`+ -`), factor (`* /`), postfix (`.name` / call
/// chains), primary.
#[derive(Debug)]
pub struct Parser<'a> {
    token_stream: RefCell<Peekable<TokenStream<'a>>>,
}

impl<'a> Parser<'a> {
    pub fn new(token_stream: TokenStream<'a>) -> Self {
        Self { token_stream: RefCell::new(token_stream.peekable()) }
    }

    /// Parses the whole program. After a syntax error the parser
    /// synchronizes to the next statement boundary and keeps going, so one
    /// pass reports every error.
    pub fn parse(&self) -> std::result::Result<Vec<Stmt<'a>>, LoxErrors> {
        let mut errors = LoxErrors(Vec::new());
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.synchronize();
                    errors.0.push(e)
                }
            }
        }

        if errors.0.is_empty() {
            Ok(stmts)
        } else {
            Err(errors)
        }
    }

    fn statement(&self) -> Result<Stmt<'a>> {
        if self.consume(Print)?.is_ok() {
            return self.print_statement();
        }

        self.expression_statement()
    }

    fn print_statement(&self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolon)?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolon)?;

        Ok(Stmt::Expression(value))
    }

    fn expression(&self) -> Result<Expr<'a>> {
        self.assignment()
    }

    fn assignment(&self) -> Result<Expr<'a>> {
        let expr = self.equality()?;

        if let Ok(equal) = self.consume(Equal)? {
            let value = Box::new(self.assignment()?);

            return match expr {
                Expr::Variable(_) | Expr::Get { .. } => {
                    Ok(Expr::Assign { target: Box::new(expr), value })
                }
                _ => Err(ParserError::new(ParserErrorType::InvalidAssignmentTarget, equal).into()),
            };
        }

        Ok(expr)
    }

    fn equality(&self) -> Result<Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(Ok(BangEqual)) | Some(Ok(EqualEqual)) = self.peek() {
            let operator = self.advance()?;
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn comparison(&self) -> Result<Expr<'a>> {
        let mut expr = self.term()?;

        while let Some(Ok(Greater))
        | Some(Ok(GreaterEqual))
        | Some(Ok(Less))
        | Some(Ok(LessEqual)) = self.peek()
        {
            let operator = self.advance()?;
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn term(&self) -> Result<Expr<'a>> {
        let mut expr = self.factor()?;

        while let Some(Ok(Plus)) | Some(Ok(Minus)) = self.peek() {
            let operator = self.advance()?;
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn factor(&self) -> Result<Expr<'a>> {
        let mut expr = self.postfix()?;

        while let Some(Ok(Star)) | Some(Ok(Slash)) = self.peek() {
            let operator = self.advance()?;
            let right = Box::new(self.postfix()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    /// `.name` and `(args)` suffixes chain left-to-right on any primary:
    /// `a.b(c).d` is member `d` of the result of calling `b` on `a`.
    fn postfix(&self) -> Result<Expr<'a>> {
        let mut expr = self.primary()?;

        loop {
            if self.consume(LeftParen)?.is_ok() {
                expr = self.finish_call(expr)?;
            } else if self.consume(Dot)?.is_ok() {
                let name =
                    self.consume_or_error(Identifier, ParserErrorType::ExpectedPropertyName)?;
                expr = Expr::Get { object: Box::new(expr), name };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&self, callee: Expr<'a>) -> Result<Expr<'a>> {
        let mut arguments = Vec::new();

        if self.peek() != Some(Ok(RightParen)) {
            loop {
                arguments.push(self.expression()?);

                if self.consume(Comma)?.is_err() {
                    break;
                }
            }
        }

        let closing_paren =
            self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;

        Ok(Expr::Call { callee: Box::new(callee), closing_paren, arguments })
    }

    fn primary(&self) -> Result<Expr<'a>> {
        let token = self.advance()?;
        match &token.data {
            TokenData::False => Ok(Expr::Literal(LiteralValue::Boolean(false))),
            TokenData::True => Ok(Expr::Literal(LiteralValue::Boolean(true))),
            TokenData::Str(s) => Ok(Expr::Literal(LiteralValue::Str(*s))),
            TokenData::Number(n) => Ok(Expr::Literal(LiteralValue::Number(*n))),
            TokenData::Nil => Ok(Expr::Literal(LiteralValue::Nil)),
            TokenData::LeftParen => {
                // Parenthesization re-enters at the top of the expression
                // grammar, so `(a == b)` and `(a = b)` both parse.
                let expr = self.expression()?;

                self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;

                Ok(Expr::Grouping(Box::new(expr)))
            }
            TokenData::Identifier => Ok(Expr::Variable(token)),

            _ => Err(ParserError::new(ParserErrorType::ExpectedPrimaryExpression, token).into()),
        }
    }

    fn consume(&self, kind: TokenKind) -> Result<std::result::Result<Token<'a>, Token<'a>>> {
        match self.peek_token() {
            Some(Ok(t)) if t.kind() == kind => Ok(Ok(self.advance().unwrap())),
            Some(Ok(t)) => Ok(Err(t)),
            Some(Err(err)) => Err(err),
            None => unreachable!("Should have hit Eof"),
        }
    }

    fn consume_or_error(&self, kind: TokenKind, error_type: ParserErrorType) -> Result<Token<'a>> {
        match self.consume(kind)? {
            Ok(token) => Ok(token),
            Err(token) => Err(ParserError::new(error_type, token).into()),
        }
    }

    fn synchronize(&self) {
        loop {
            match self.peek() {
                Some(Ok(Eof)) | None => return,
                // Next statement starts here, don't eat the keyword
                Some(Ok(Print)) => return,
                Some(Ok(Semicolon)) => {
                    let _ = self.advance();
                    return;
                }
                _ => {
                    let _ = self.advance();
                }
            }
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek_token(&self) -> Option<Result<Token<'a>>> {
        self.token_stream.borrow_mut().peek().cloned()
    }

    fn peek(&self) -> Option<Result<TokenKind>> {
        self.peek_token().map(|t| t.map(|t| t.kind()))
    }

    fn advance(&self) -> Result<Token<'a>> {
        self.token_stream.borrow_mut().next().unwrap()
    }

    fn is_at_end(&self) -> bool {
        match self.peek() {
            Some(Ok(Eof)) => true,
            Some(_) => false,
            None => true,
        }
    }
}
