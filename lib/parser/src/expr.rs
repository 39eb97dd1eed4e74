use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use scanner::Token;

/// An expression tree. Nodes exclusively own their children and borrow
/// their lexemes from the source buffer.
#[derive(Debug)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Literal(LiteralValue<'a>),
    Variable(Token<'a>),
    /// `target` is always a `Variable` or a `Get`, the parser rejects
    /// anything else.
    Assign { target: Box<Expr<'a>>, value: Box<Expr<'a>> },
    Get { object: Box<Expr<'a>>, name: Token<'a> },
    Call { callee: Box<Expr<'a>>, closing_paren: Token<'a>, arguments: Vec<Expr<'a>> },
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
            Expr::Variable(token) => {
                write!(f, "{}", token.lexeme())
            }
            Expr::Assign { target, value } => {
                write!(f, "(assign {} {})", target, value)
            }
            Expr::Get { object, name } => {
                write!(f, "(get {} {})", object, name.lexeme())
            }
            Expr::Call { callee, arguments, .. } => {
                write!(
                    f,
                    "(call {}{})",
                    callee,
                    arguments.iter().map(|a| format!(" {}", a)).join("")
                )
            }
        }
    }
}

#[derive(Debug)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl<'a> Display for LiteralValue<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
