use crate::Expr;

/// The closed statement set of the grammar. Designed for additive
/// extension; evaluation order of a program is the textual order of its
/// statements.
#[derive(Debug)]
pub enum Stmt<'a> {
    Expression(Expr<'a>),
    Print(Expr<'a>),
}
