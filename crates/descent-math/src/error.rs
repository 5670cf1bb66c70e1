//! Error types for the numerical core.

use descent_core::CoreError;
use thiserror::Error;

use crate::expression::ExpressionError;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur in the numerical core.
///
/// Numerical degeneracy (NaN, overflow) is deliberately absent: such values
/// are recorded in the optimizer history rather than raised.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A user expression failed to compile.
    #[error("Invalid expression: {0}")]
    Expression(#[from] ExpressionError),

    /// No function is registered under the requested name.
    #[error("Unknown function '{name}'. Available: [{}]", .available.join(", "))]
    UnknownFunction {
        /// The requested name.
        name: String,
        /// Names that are registered.
        available: Vec<String>,
    },

    /// A function with the same name is already registered.
    #[error("Function '{name}' is already registered")]
    DuplicateFunction {
        /// The conflicting name.
        name: String,
    },

    /// An optimizer setting is out of range.
    #[error("Invalid optimizer config: {field} {reason}")]
    InvalidConfig {
        /// The offending field (wire name).
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The optimizer was driven before `initialize` was called.
    #[error("Optimizer is not initialized: call initialize(x0, y0) first")]
    NotInitialized,

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Core domain error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Export serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An export bundle could not be parsed.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl MathError {
    /// Creates an unknown function error.
    #[must_use]
    pub fn unknown_function<S: AsRef<str>>(name: impl Into<String>, available: &[S]) -> Self {
        Self::UnknownFunction {
            name: name.into(),
            available: available.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MathError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
