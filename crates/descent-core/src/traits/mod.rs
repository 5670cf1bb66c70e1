//! Core traits for the Descent playground.
//!
//! - [`ObjectiveFunction`]: A bivariate surface the optimizer can descend

use std::fmt;

use crate::types::{Bounds, FunctionInfo, GlobalMinimum, Vec2};

/// A scalar surface `f(x, y)` with its gradient.
///
/// Built-in surfaces provide closed-form gradients; user-defined surfaces
/// may estimate them with central finite differences. Implementations must
/// not panic on non-finite input: NaN and infinities are returned as-is so
/// that degenerate runs stay observable.
pub trait ObjectiveFunction: Send + Sync {
    /// Registry name of the function (e.g. `"rosenbrock"`).
    fn name(&self) -> &str;

    /// Human-readable description, usually the formula.
    fn description(&self) -> &str;

    /// Surface height at `(x, y)`.
    fn value(&self, x: f64, y: f64) -> f64;

    /// Partial derivatives `(∂f/∂x, ∂f/∂y)` at `(x, y)`.
    fn gradient(&self, x: f64, y: f64) -> Vec2;

    /// Plotting domain of the surface.
    fn bounds(&self) -> Bounds;

    /// Known global minimum, if the surface has one.
    fn global_minimum(&self) -> Option<GlobalMinimum> {
        None
    }

    /// Default step size for descending this surface.
    fn recommended_learning_rate(&self) -> f64;

    /// Name and description bundled for exports.
    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(self.name(), self.description())
    }

    /// Surface height at a point.
    fn value_at(&self, p: Vec2) -> f64 {
        self.value(p.x, p.y)
    }

    /// Gradient at a point.
    fn gradient_at(&self, p: Vec2) -> Vec2 {
        self.gradient(p.x, p.y)
    }
}

impl fmt::Debug for dyn ObjectiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectiveFunction")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
