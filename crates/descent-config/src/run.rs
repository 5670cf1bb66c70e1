//! Run configuration types.
//!
//! A [`RunConfig`] names everything needed to reproduce a run: the surface
//! (a registry name or an expression), the start point, and the optimizer
//! settings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use descent_core::{ObjectiveFunction, Vec2};
use descent_math::expression::CompiledExpression;
use descent_math::{CustomFunction, FunctionRegistry, Optimizer, OptimizerConfig};

use crate::error::{ConfigResult, Validate, ValidationError};

// =============================================================================
// RUN CONFIGURATION
// =============================================================================

/// A complete, reproducible optimization run.
///
/// When `expression` is set, `function` is the name given to the compiled
/// surface; otherwise it is looked up in the function registry. When
/// `optimizer` is absent the defaults are used with the function's
/// recommended learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Description of this configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry name, or the name for `expression`.
    #[serde(default = "default_function")]
    pub function: String,

    /// Surface expression in `x` and `y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Steps per animation tick when driven incrementally.
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: usize,

    /// Whether this configuration is read-only.
    #[serde(default, skip_serializing)]
    pub read_only: bool,

    /// Start point.
    pub start: Vec2,

    /// Optimizer settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerConfig>,
}

fn default_function() -> String {
    "quadratic".to_string()
}

fn default_steps_per_tick() -> usize {
    5
}

impl RunConfig {
    /// Creates a run of a registry function from `(x0, y0)`.
    pub fn new(name: impl Into<String>, function: impl Into<String>, x0: f64, y0: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            function: function.into(),
            expression: None,
            steps_per_tick: default_steps_per_tick(),
            read_only: false,
            start: Vec2::new(x0, y0),
            optimizer: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Uses a custom expression as the surface.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Sets the optimizer settings.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Sets the steps per tick.
    pub fn with_steps_per_tick(mut self, steps: usize) -> Self {
        self.steps_per_tick = steps;
        self
    }

    /// Marks as read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    // =========================================================================
    // STANDARD PRESETS
    // =========================================================================

    /// Unit bowl; converges in a few dozen steps.
    pub fn bowl() -> Self {
        Self::new("bowl", "quadratic", 4.0, 3.0)
            .with_description("Unit bowl, vanilla gradient descent")
            .with_optimizer(OptimizerConfig::default().with_learning_rate(0.1))
            .read_only()
    }

    /// Rosenbrock valley with heavy-ball momentum.
    pub fn rosenbrock_momentum() -> Self {
        Self::new("rosenbrock-momentum", "rosenbrock", -1.2, 1.0)
            .with_description("Rosenbrock banana valley with momentum 0.9")
            .with_optimizer(
                OptimizerConfig::default()
                    .with_learning_rate(0.001)
                    .with_momentum(0.9)
                    .with_max_iterations(5000),
            )
            .with_steps_per_tick(20)
            .read_only()
    }

    /// Himmelblau with a decaying learning rate.
    pub fn himmelblau_decay() -> Self {
        Self::new("himmelblau-decay", "himmelblau", 0.0, 0.0)
            .with_description("Himmelblau from the origin with learning-rate decay")
            .with_optimizer(
                OptimizerConfig::default()
                    .with_learning_rate(0.01)
                    .with_decay(0.995),
            )
            .read_only()
    }

    /// Rastrigin from a start that settles in a local minimum.
    pub fn rastrigin_trap() -> Self {
        Self::new("rastrigin-trap", "rastrigin", 2.2, -1.8)
            .with_description("Rastrigin: plain descent stops in the nearest local minimum")
            .with_optimizer(
                OptimizerConfig::default()
                    .with_learning_rate(0.002)
                    .with_max_iterations(2000),
            )
            .read_only()
    }

    /// Beale's plateau.
    pub fn beale() -> Self {
        Self::new("beale", "beale", 1.0, 1.5)
            .with_description("Beale plateau with light momentum")
            .with_optimizer(
                OptimizerConfig::default()
                    .with_learning_rate(0.001)
                    .with_momentum(0.5)
                    .with_max_iterations(10000),
            )
            .with_steps_per_tick(50)
            .read_only()
    }

    /// Booth's function.
    pub fn booth() -> Self {
        Self::new("booth", "booth", -5.0, 5.0)
            .with_description("Booth function, vanilla gradient descent")
            .with_optimizer(OptimizerConfig::default().with_learning_rate(0.05))
            .read_only()
    }

    /// Unit bowl with a learning rate past the stability limit.
    pub fn unstable_bowl() -> Self {
        Self::new("unstable-bowl", "quadratic", 2.0, 2.0)
            .with_description("Unit bowl with learning rate 1.1 > 2/L: diverges")
            .with_optimizer(
                OptimizerConfig::default()
                    .with_learning_rate(1.1)
                    .with_max_iterations(200),
            )
            .read_only()
    }

    /// Every standard preset.
    pub fn standard_presets() -> Vec<Self> {
        vec![
            Self::bowl(),
            Self::rosenbrock_momentum(),
            Self::himmelblau_decay(),
            Self::rastrigin_trap(),
            Self::beale(),
            Self::booth(),
            Self::unstable_bowl(),
        ]
    }

    // =========================================================================
    // BUILDING
    // =========================================================================

    /// Resolves the surface against `registry`, compiling `expression` if set.
    pub fn resolve_function(
        &self,
        registry: &FunctionRegistry,
    ) -> ConfigResult<Arc<dyn ObjectiveFunction>> {
        match &self.expression {
            Some(expression) => {
                let function = CustomFunction::new(self.function.as_str(), expression)?;
                Ok(Arc::new(function))
            }
            None => Ok(registry.get(&self.function)?),
        }
    }

    /// Optimizer settings for `function`.
    pub fn optimizer_config(&self, function: &dyn ObjectiveFunction) -> OptimizerConfig {
        self.optimizer
            .unwrap_or_else(|| OptimizerConfig::for_function(function))
    }

    /// Validates, resolves against the built-in registry, and returns an
    /// optimizer initialized at the start point.
    pub fn build(&self) -> ConfigResult<Optimizer> {
        self.build_with(&FunctionRegistry::new())
    }

    /// Like [`build`](Self::build) with a caller-supplied registry.
    pub fn build_with(&self, registry: &FunctionRegistry) -> ConfigResult<Optimizer> {
        self.validate_or_error()?;

        let function = self.resolve_function(registry)?;
        let config = self.optimizer_config(function.as_ref());
        let mut optimizer = Optimizer::new(function, config)?;
        optimizer.initialize(self.start.x, self.start.y);

        log::debug!(
            "built run '{}' on '{}' from {}",
            self.name,
            self.function,
            self.start
        );
        Ok(optimizer)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        if self.function.trim().is_empty() {
            errors.push(ValidationError::new("function", "Function cannot be empty"));
        }

        if let Some(expression) = &self.expression {
            if let Err(e) = CompiledExpression::compile(expression) {
                errors.push(ValidationError::with_rule(
                    "expression",
                    e.to_string(),
                    "valid_expression",
                ));
            }
        }

        if !self.start.is_finite() {
            errors.push(ValidationError::with_rule(
                "start",
                format!("Start point {} must be finite", self.start),
                "finite_start",
            ));
        }

        if self.steps_per_tick == 0 {
            errors.push(ValidationError::with_rule(
                "stepsPerTick",
                "Steps per tick must be at least 1",
                "valid_steps_per_tick",
            ));
        }

        if let Some(optimizer) = &self.optimizer {
            for violation in optimizer.violations() {
                errors.push(ValidationError::with_rule(
                    format!("optimizer.{}", violation.field),
                    violation.message,
                    "optimizer_range",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use descent_math::{MathError, Phase};

    #[test]
    fn test_presets_are_valid_and_build() {
        for preset in RunConfig::standard_presets() {
            assert!(preset.is_valid(), "{} invalid: {:?}", preset.name, preset.validate());
            assert!(preset.read_only);

            let optimizer = preset.build().unwrap();
            assert_eq!(optimizer.phase(), Phase::Running);
            assert_eq!(optimizer.state().position, preset.start);
        }
    }

    #[test]
    fn test_optimizer_defaults_to_recommended_rate() {
        let run = RunConfig::new("r", "rosenbrock", 0.0, 0.0);
        let optimizer = run.build().unwrap();
        assert_eq!(optimizer.config().learning_rate, 0.001);
    }

    #[test]
    fn test_expression_run() {
        let run = RunConfig::new("ripple", "ripple", 0.5, 0.5)
            .with_expression("sin(x) * cos(y) + 0.1 * (x^2 + y^2)");
        let optimizer = run.build().unwrap();
        assert_eq!(optimizer.function().name(), "ripple");
        assert_eq!(optimizer.config().learning_rate, 0.01);
    }

    #[test]
    fn test_unknown_function_surfaces_math_error() {
        let err = RunConfig::new("r", "ackley", 0.0, 0.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Math(MathError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = FunctionRegistry::empty();
        registry.register_expression("plane_bowl", "x^2 + y").unwrap();

        let run = RunConfig::new("r", "plane_bowl", 1.0, 1.0);
        assert!(run.build_with(&registry).is_ok());
        assert!(run.build().is_err());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let run = RunConfig::new("", "quadratic", f64::NAN, 0.0)
            .with_expression("sin(")
            .with_steps_per_tick(0)
            .with_optimizer(OptimizerConfig::default().with_momentum(1.5));

        let fields: Vec<String> = run.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "name",
                "expression",
                "start",
                "stepsPerTick",
                "optimizer.momentum"
            ]
        );
        assert!(matches!(
            run.build().unwrap_err(),
            ConfigError::MultipleValidationErrors(_)
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(RunConfig::rosenbrock_momentum()).unwrap();
        assert_eq!(json["name"], "rosenbrock-momentum");
        assert_eq!(json["stepsPerTick"], 20);
        assert_eq!(json["start"]["x"], -1.2);
        assert_eq!(json["optimizer"]["momentum"], 0.9);
        assert!(json.get("readOnly").is_none());
        assert!(json.get("expression").is_none());
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let run: RunConfig =
            serde_json::from_str(r#"{"name": "tiny", "start": {"x": 1.0, "y": 2.0}}"#).unwrap();
        assert_eq!(run.function, "quadratic");
        assert_eq!(run.steps_per_tick, 5);
        assert!(run.optimizer.is_none());
        assert!(!run.read_only);
    }
}
