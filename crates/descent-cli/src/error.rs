//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither a function name nor an expression was given.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// A numeric argument is out of range.
    #[error("Invalid {name}: {value}. {reason}")]
    InvalidArgument {
        /// Flag name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// What is expected instead.
        reason: &'static str,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
