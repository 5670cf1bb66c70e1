//! Error types for the core domain types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing core domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Domain bounds are empty, inverted or not finite.
    #[error("Invalid bounds [{min}, {max}]: {reason}")]
    InvalidBounds {
        /// Lower edge.
        min: f64,
        /// Upper edge.
        max: f64,
        /// Why the bounds were rejected.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid bounds error.
    #[must_use]
    pub fn invalid_bounds(min: f64, max: f64, reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            min,
            max,
            reason: reason.into(),
        }
    }
}
