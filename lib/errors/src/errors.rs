use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::{Col, Line};
use itertools::Itertools;

/// A positioned front-end error. Scan and parse failures are both reported
/// in this shape so callers only deal with one error currency.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("error (l. {line}, c. {col}): {message}")]
pub struct LoxError {
    pub line: Line,
    pub col: Col,
    pub message: String,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|e| e.to_string()).join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, LoxError>;
