//! User-defined surfaces from expressions.

use descent_core::{Bounds, GlobalMinimum, ObjectiveFunction, Vec2};

use crate::error::{MathError, MathResult};
use crate::expression::CompiledExpression;
use crate::gradient::{central_difference, DEFAULT_GRADIENT_STEP};

/// Default learning rate for user-defined surfaces.
pub const DEFAULT_CUSTOM_LEARNING_RATE: f64 = 0.01;

/// A surface defined by an expression in `x` and `y`.
///
/// The expression is compiled when the function is built, so malformed
/// input fails here rather than in the middle of a run. Unless closed-form
/// partial derivatives are supplied with [`with_gradient`](Self::with_gradient),
/// the gradient is estimated by central differences.
///
/// # Example
///
/// ```rust
/// use descent_math::prelude::*;
///
/// let f = CustomFunction::new("ripple", "sin(x) * cos(y)")
///     .unwrap()
///     .with_bounds(Bounds::symmetric(3.0));
///
/// let g = f.gradient(0.0, 0.0);
/// assert!((g.x - 1.0).abs() < 1e-8);
///
/// assert!(CustomFunction::new("bad", "sin(x").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CustomFunction {
    name: String,
    description: String,
    expression: CompiledExpression,
    partials: Option<(CompiledExpression, CompiledExpression)>,
    bounds: Bounds,
    learning_rate: f64,
    global_minimum: Option<GlobalMinimum>,
    gradient_step: f64,
}

impl CustomFunction {
    /// Compiles `expression` into a named surface.
    pub fn new(name: impl Into<String>, expression: &str) -> MathResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MathError::invalid_input("function name must not be empty"));
        }

        let expression = CompiledExpression::compile(expression)?;
        log::debug!(
            "compiled custom function '{}' ({} ops)",
            name,
            expression.len()
        );

        Ok(Self {
            name,
            description: expression.source().to_string(),
            expression,
            partials: None,
            bounds: Bounds::default(),
            learning_rate: DEFAULT_CUSTOM_LEARNING_RATE,
            global_minimum: None,
            gradient_step: DEFAULT_GRADIENT_STEP,
        })
    }

    /// Sets the description (defaults to the expression source).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the plotting domain.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the recommended learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> MathResult<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(MathError::invalid_input(format!(
                "learning rate must be positive and finite, got {learning_rate}"
            )));
        }
        self.learning_rate = learning_rate;
        Ok(self)
    }

    /// Declares a known global minimum.
    pub fn with_global_minimum(mut self, minimum: GlobalMinimum) -> Self {
        self.global_minimum = Some(minimum);
        self
    }

    /// Sets the finite-difference step used when no closed-form gradient is given.
    pub fn with_gradient_step(mut self, h: f64) -> MathResult<Self> {
        if !(h.is_finite() && h > 0.0) {
            return Err(MathError::invalid_input(format!(
                "gradient step must be positive and finite, got {h}"
            )));
        }
        self.gradient_step = h;
        Ok(self)
    }

    /// Supplies closed-form partial derivatives `∂f/∂x` and `∂f/∂y`.
    pub fn with_gradient(mut self, dx: &str, dy: &str) -> MathResult<Self> {
        let dx = CompiledExpression::compile(dx)?;
        let dy = CompiledExpression::compile(dy)?;
        self.partials = Some((dx, dy));
        Ok(self)
    }

    /// The compiled value expression.
    pub fn expression(&self) -> &CompiledExpression {
        &self.expression
    }

    /// Returns true if the gradient is closed-form rather than estimated.
    pub fn has_analytic_gradient(&self) -> bool {
        self.partials.is_some()
    }

    /// Finite-difference step.
    pub fn gradient_step(&self) -> f64 {
        self.gradient_step
    }
}

impl ObjectiveFunction for CustomFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        self.expression.eval(x, y)
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        match &self.partials {
            Some((dx, dy)) => Vec2::new(dx.eval(x, y), dy.eval(x, y)),
            None => central_difference(
                |px, py| self.expression.eval(px, py),
                x,
                y,
                self.gradient_step,
            ),
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        self.global_minimum
    }

    fn recommended_learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ExpressionError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_value_and_numerical_gradient() {
        let f = CustomFunction::new("bowl", "(x - 1)^2 + (y - 1)^2").unwrap();
        assert_eq!(f.value(2.0, 2.0), 2.0);
        assert_eq!(f.description(), "(x - 1)^2 + (y - 1)^2");
        assert!(!f.has_analytic_gradient());

        let g = f.gradient(2.0, 3.0);
        assert_abs_diff_eq!(g.x, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g.y, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_analytic_gradient() {
        let f = CustomFunction::new("bowl", "x^2 + 3*y^2")
            .unwrap()
            .with_gradient("2*x", "6*y")
            .unwrap();
        assert!(f.has_analytic_gradient());
        assert_eq!(f.gradient(1.5, -1.0), Vec2::new(3.0, -6.0));
    }

    #[test]
    fn test_malformed_expression_fails_at_construction() {
        let err = CustomFunction::new("bad", "x + * y").unwrap_err();
        assert!(matches!(
            err,
            MathError::Expression(ExpressionError::UnexpectedToken { pos: 4, .. })
        ));

        let err = CustomFunction::new("bad", "x")
            .unwrap()
            .with_gradient("1", "cos(")
            .unwrap_err();
        assert!(matches!(err, MathError::Expression(_)));
    }

    #[test]
    fn test_builder_validation() {
        let f = CustomFunction::new("f", "x").unwrap();
        assert!(f.clone().with_learning_rate(0.0).is_err());
        assert!(f.clone().with_learning_rate(f64::NAN).is_err());
        assert!(f.clone().with_gradient_step(-1e-6).is_err());
        assert!(CustomFunction::new("  ", "x").is_err());

        let f = f
            .with_learning_rate(0.2)
            .unwrap()
            .with_gradient_step(1e-4)
            .unwrap()
            .with_description("identity in x")
            .with_global_minimum(GlobalMinimum::new(0.0, 0.0, 0.0));
        assert_eq!(f.recommended_learning_rate(), 0.2);
        assert_eq!(f.gradient_step(), 1e-4);
        assert_eq!(f.description(), "identity in x");
        assert!(f.global_minimum().is_some());
    }

    #[test]
    fn test_defaults() {
        let f = CustomFunction::new("f", "x * y").unwrap();
        assert_eq!(f.bounds(), Bounds::symmetric(5.0));
        assert_eq!(f.recommended_learning_rate(), DEFAULT_CUSTOM_LEARNING_RATE);
        assert_eq!(f.gradient_step(), DEFAULT_GRADIENT_STEP);
        assert!(f.global_minimum().is_none());
    }

    #[test]
    fn test_degenerate_values_flow_through() {
        let f = CustomFunction::new("log", "ln(x)").unwrap();
        assert!(f.value(-1.0, 0.0).is_nan());
        assert!(!f.gradient(0.0, 0.0).is_finite());
    }
}
