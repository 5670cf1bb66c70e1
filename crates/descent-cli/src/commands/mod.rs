//! CLI command implementations.

pub mod eval;
pub mod functions;
pub mod presets;
pub mod run;

// Re-export submodules for convenience
pub use eval::EvalArgs;
pub use functions::FunctionsArgs;
pub use presets::PresetsArgs;
pub use run::RunArgs;

use std::sync::Arc;

use descent_core::ObjectiveFunction;
use descent_math::{CustomFunction, FunctionRegistry};

use crate::error::{CliError, CliResult};

/// Name given to surfaces passed with `--expr`.
pub const EXPRESSION_NAME: &str = "expression";

/// Resolves `--function` or `--expr` to an objective.
pub fn resolve_function(
    function: Option<&str>,
    expression: Option<&str>,
) -> anyhow::Result<Arc<dyn ObjectiveFunction>> {
    match (function, expression) {
        (_, Some(expression)) => Ok(Arc::new(CustomFunction::new(EXPRESSION_NAME, expression)?)),
        (Some(name), None) => Ok(FunctionRegistry::new().get(name)?),
        (None, None) => Err(CliError::MissingArgument("--function or --expr".to_string()).into()),
    }
}

/// Validates a coordinate.
pub fn validate_coordinate(name: &'static str, value: f64) -> CliResult<f64> {
    if !value.is_finite() {
        return Err(CliError::InvalidArgument {
            name,
            value: value.to_string(),
            reason: "Must be finite.",
        });
    }
    Ok(value)
}

/// Validates a positive count such as `--chunk` or `--every`.
pub fn validate_count(name: &'static str, value: usize) -> CliResult<usize> {
    if value == 0 {
        return Err(CliError::InvalidArgument {
            name,
            value: value.to_string(),
            reason: "Must be at least 1.",
        });
    }
    Ok(value)
}
