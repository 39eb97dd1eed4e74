use std::io::Write;

use errors::LoxErrors;
use parser::{Expr, LiteralValue, Parser, Stmt};
use scanner::{token::TokenData, TokenStream};

mod environment;
mod object;
mod value;

use environment::Environment;
pub use object::{NativeMethod, Object, ObjectRef};
pub use value::Value;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Unsupported operands for `{operator}`: {left} and {right}")]
    InvalidBinaryOperands { operator: String, left: Value, right: Value },
    #[error("Tried to divide by zero")]
    DivisionByZero,
    #[error("Only objects have properties: {0}")]
    NotAnObject(Value),
    #[error("Undefined property: {0}")]
    UndefinedProperty(String),
    #[error("Not callable: {0}")]
    NotCallable(Value),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("{0}")]
    CompileError(#[from] LoxErrors),
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] RuntimeError),
}

/// Tree-walking evaluator. Owns the variable environment for its runs, so
/// independent interpreters never share state; `print` output goes to the
/// writer passed into [`Interpreter::run_source`], which makes runs
/// testable and isolated.
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a global before running. This is the host's hook for handing
    /// objects to a script, since no expression constructs one.
    pub fn define(&mut self, name: &str, value: Value) {
        self.environment.define(name, value);
    }

    pub fn run_source(
        &mut self,
        source: &str,
        output: &mut impl Write,
    ) -> Result<(), InterpretError> {
        let parser = Parser::new(TokenStream::new(source));
        let stmts = parser.parse()?;
        self.interpret(&stmts, output)?;
        Ok(())
    }

    /// Executes statements in textual order, fail-fast: the first failing
    /// statement aborts the rest, already-written print output stands.
    pub fn interpret(
        &mut self,
        stmts: &[Stmt],
        output: &mut impl Write,
    ) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.execute(stmt, output)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt, output: &mut impl Write) -> Result<(), RuntimeError> {
        log::trace!("executing: {:?}", stmt);
        match stmt {
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(output, "{}", value)?;
                Ok(())
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        use Expr::*;
        match expr {
            Literal(LiteralValue::Number(n)) => Ok((*n).into()),
            Literal(LiteralValue::Str(s)) => Ok((*s).into()),
            Literal(LiteralValue::Boolean(b)) => Ok((*b).into()),
            Literal(LiteralValue::Nil) => Ok(Value::Nil),

            Grouping(expr) => self.evaluate(expr),

            Variable(token) => self
                .environment
                .get(token.lexeme())
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(token.lexeme().to_string())),

            Assign { target, value } => {
                let value = self.evaluate(value)?;
                match target.as_ref() {
                    // There is no declaration syntax, assignment binds or
                    // overwrites. The assignment is itself an expression
                    // and yields the assigned value.
                    Variable(name) => {
                        self.environment.define(name.lexeme(), value.clone());
                        Ok(value)
                    }
                    Get { object, name } => {
                        let object = self.evaluate(object)?;
                        match &object {
                            Value::Object(obj) => {
                                obj.borrow_mut().set_property(name.lexeme(), value.clone());
                                Ok(value)
                            }
                            _ => Err(RuntimeError::NotAnObject(object)),
                        }
                    }
                    target => unreachable!(
                        "Parser only accepts variables and member accesses as assignment targets, got {}",
                        target
                    ),
                }
            }

            Binary { left, operator, right } => {
                // Both operands are evaluated eagerly; the grammar has no
                // short-circuiting operators.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (&left, &right, &operator.data) {
                    (Value::Number(l), Value::Number(r), TokenData::Minus) => Ok((l - r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::Slash) => {
                        if *r != 0.0 {
                            Ok((l / r).into())
                        } else {
                            Err(RuntimeError::DivisionByZero)
                        }
                    }
                    (Value::Number(l), Value::Number(r), TokenData::Star) => Ok((l * r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::Plus) => Ok((l + r).into()),
                    (Value::Str(l), Value::Str(r), TokenData::Plus) => Ok((l.clone() + r).into()),

                    (Value::Number(l), Value::Number(r), TokenData::Greater) => Ok((l > r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::GreaterEqual) => {
                        Ok((l >= r).into())
                    }
                    (Value::Number(l), Value::Number(r), TokenData::Less) => Ok((l < r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::LessEqual) => {
                        Ok((l <= r).into())
                    }

                    // Equality never coerces: different kinds are simply
                    // not equal, objects compare by identity.
                    (_, _, TokenData::EqualEqual) => Ok((left == right).into()),
                    (_, _, TokenData::BangEqual) => Ok((left != right).into()),

                    _ => Err(RuntimeError::InvalidBinaryOperands {
                        operator: operator.lexeme().to_string(),
                        left,
                        right,
                    }),
                }
            }

            Get { object, name } => {
                let object = self.evaluate(object)?;
                match &object {
                    Value::Object(obj) => obj
                        .borrow()
                        .property(name.lexeme())
                        .cloned()
                        .ok_or_else(|| RuntimeError::UndefinedProperty(name.lexeme().to_string())),
                    _ => Err(RuntimeError::NotAnObject(object)),
                }
            }

            Call { callee, arguments, .. } => self.call(callee, arguments),
        }
    }

    /// Only object-bound methods are callable, and methods are not
    /// first-class values, so dispatch pattern-matches the
    /// `object.name(args)` shape instead of evaluating `object.name`.
    ///
    /// The callee (receiver first) and all arguments are evaluated
    /// left-to-right before dispatch can fail, so argument side effects
    /// (assignments) happen even when the call itself errors.
    fn call(&mut self, callee: &Expr, arguments: &[Expr]) -> Result<Value, RuntimeError> {
        let Expr::Get { object, name } = callee else {
            let value = self.evaluate(callee)?;
            self.evaluate_arguments(arguments)?;
            return Err(RuntimeError::NotCallable(value));
        };

        let receiver = self.evaluate(object)?;
        let args = self.evaluate_arguments(arguments)?;

        let Value::Object(obj) = &receiver else {
            return Err(RuntimeError::NotAnObject(receiver));
        };

        let Some(method) = obj.borrow().method(name.lexeme()) else {
            return match obj.borrow().property(name.lexeme()) {
                Some(value) => Err(RuntimeError::NotCallable(value.clone())),
                None => Err(RuntimeError::UndefinedProperty(name.lexeme().to_string())),
            };
        };

        log::trace!("calling method {:?} with {} arguments", name.lexeme(), args.len());
        method(obj.clone(), &args)
    }

    fn evaluate_arguments(&mut self, arguments: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        arguments.iter().map(|argument| self.evaluate(argument)).collect()
    }
}
