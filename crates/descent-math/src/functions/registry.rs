//! Name-based function lookup.

use std::fmt;
use std::sync::Arc;

use descent_core::ObjectiveFunction;

use super::builtin::{builtin, BUILTIN_NAMES};
use super::custom::CustomFunction;
use crate::error::{MathError, MathResult};

/// Lookup table from registry name to objective function.
///
/// Functions are kept in registration order, so listings are stable.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: Vec<Arc<dyn ObjectiveFunction>>,
}

impl FunctionRegistry {
    /// Creates a registry holding every built-in surface.
    pub fn new() -> Self {
        let functions = BUILTIN_NAMES
            .iter()
            .filter_map(|name| builtin(name).ok())
            .collect();
        Self { functions }
    }

    /// Creates a registry with no functions.
    pub fn empty() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> MathResult<Arc<dyn ObjectiveFunction>> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .ok_or_else(|| MathError::unknown_function(name, &self.names()))
    }

    /// Returns true if a function with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name() == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name()).collect()
    }

    /// Iterates over registered functions.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ObjectiveFunction>> {
        self.functions.iter()
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Adds a function. Names must be unique.
    pub fn register(&mut self, function: Arc<dyn ObjectiveFunction>) -> MathResult<()> {
        if self.contains(function.name()) {
            return Err(MathError::DuplicateFunction {
                name: function.name().to_string(),
            });
        }
        log::debug!("registered function '{}'", function.name());
        self.functions.push(function);
        Ok(())
    }

    /// Compiles `expression` and registers it under `name`.
    pub fn register_expression(
        &mut self,
        name: &str,
        expression: &str,
    ) -> MathResult<Arc<dyn ObjectiveFunction>> {
        let function: Arc<dyn ObjectiveFunction> =
            Arc::new(CustomFunction::new(name, expression)?);
        self.register(Arc::clone(&function))?;
        Ok(function)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
