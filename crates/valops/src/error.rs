//! Error types for the valops crate.

use thiserror::Error;

use crate::operator::Operator;

/// Errors that can occur while turning operator-wrapped values into expressions.
///
/// Every failure is local to the predicate being built for one field; none of
/// them leaves the registry or its caches in a different state.
#[derive(Debug, Error)]
pub enum ValopsError {
    /// A blank value where one was required, or a value that fails the
    /// backend's own coercion (non-numeric text on a numeric field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid regular expression given to `matches`.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Unbalanced or badly ordered parentheses, or `not`/`ci` without an operand.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// An operator nested where it may not appear (for example `and` inside `not`).
    #[error("illegal composition: {0}")]
    IllegalComposition(String),

    /// Operator is not implemented for the field's value kind.
    #[error("operator '{op}' is not supported for {kind} values")]
    UnsupportedOperator { op: Operator, kind: &'static str },

    /// The multi-value composer resolved an operator it cannot fold.
    #[error("illegal operator '{op}' for field '{field}' (value: {value})")]
    IllegalOperator {
        op: Operator,
        field: String,
        value: String,
    },
}

/// Coarse classification of [`ValopsError`], stable for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    MalformedExpression,
    IllegalComposition,
    UnsupportedOperator,
    IllegalOperator,
}

impl ValopsError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a malformed expression error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedExpression(msg.into())
    }

    /// Create an illegal composition error.
    pub fn illegal_composition(msg: impl Into<String>) -> Self {
        Self::IllegalComposition(msg.into())
    }

    /// Create an unsupported operator error.
    pub fn unsupported(op: Operator, kind: &'static str) -> Self {
        Self::UnsupportedOperator { op, kind }
    }

    /// Returns the kind of this error. Regex failures count as invalid input.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValopsError::InvalidInput(_) | ValopsError::InvalidRegex(_) => ErrorKind::InvalidInput,
            ValopsError::MalformedExpression(_) => ErrorKind::MalformedExpression,
            ValopsError::IllegalComposition(_) => ErrorKind::IllegalComposition,
            ValopsError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            ValopsError::IllegalOperator { .. } => ErrorKind::IllegalOperator,
        }
    }
}

/// Result type for valops operations.
pub type Result<T> = std::result::Result<T, ValopsError>;
