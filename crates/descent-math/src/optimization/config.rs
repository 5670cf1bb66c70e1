//! Optimizer settings.

use descent_core::ObjectiveFunction;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default base learning rate.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// Default iteration ceiling.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Default gradient-magnitude convergence threshold.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default per-iteration decay factor for adaptive learning rates.
pub const DEFAULT_INITIAL_DECAY: f64 = 0.99;

/// Configuration for gradient descent.
///
/// Field names are camelCase on the wire, matching the export bundle.
/// Every field is optional when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerConfig {
    /// Base step size.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Hard ceiling on the number of position updates.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Converge once the gradient magnitude drops below this.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Heavy-ball momentum coefficient in `[0, 1)`; 0 disables momentum.
    #[serde(default)]
    pub momentum: f64,
    /// Decay the learning rate geometrically with the iteration count.
    #[serde(default)]
    pub adaptive_learning_rate: bool,
    /// Decay factor in `(0, 1]` used when `adaptive_learning_rate` is set.
    #[serde(default = "default_initial_decay")]
    pub initial_decay: f64,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_initial_decay() -> f64 {
    DEFAULT_INITIAL_DECAY
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            momentum: 0.0,
            adaptive_learning_rate: false,
            initial_decay: DEFAULT_INITIAL_DECAY,
        }
    }
}

/// A single out-of-range setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigViolation {
    /// Wire name of the field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl OptimizerConfig {
    /// Default settings with the function's recommended learning rate.
    pub fn for_function(function: &dyn ObjectiveFunction) -> Self {
        Self::default().with_learning_rate(function.recommended_learning_rate())
    }

    /// Sets the base learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the iteration ceiling.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the momentum coefficient.
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Enables learning-rate decay with the given factor.
    pub fn with_decay(mut self, initial_decay: f64) -> Self {
        self.adaptive_learning_rate = true;
        self.initial_decay = initial_decay;
        self
    }

    /// Turns learning-rate decay on or off without changing the factor.
    pub fn with_adaptive_learning_rate(mut self, enabled: bool) -> Self {
        self.adaptive_learning_rate = enabled;
        self
    }

    /// Learning rate applied by the step that leaves `iteration`.
    ///
    /// With decay enabled this is `learning_rate * initial_decay^iteration`,
    /// so iteration 0 always uses the base rate.
    #[inline]
    pub fn effective_learning_rate(&self, iteration: u32) -> f64 {
        if self.adaptive_learning_rate {
            self.learning_rate * self.initial_decay.powf(f64::from(iteration))
        } else {
            self.learning_rate
        }
    }

    /// Returns true if momentum is active.
    pub fn uses_momentum(&self) -> bool {
        self.momentum > 0.0
    }

    /// Every out-of-range setting, in field order.
    pub fn violations(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        let mut push = |field: &'static str, message: String| {
            violations.push(ConfigViolation { field, message });
        };

        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            push(
                "learningRate",
                format!("must be positive and finite, got {}", self.learning_rate),
            );
        }
        if self.max_iterations == 0 {
            push("maxIterations", "must be at least 1".to_string());
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            push(
                "tolerance",
                format!("must be non-negative and finite, got {}", self.tolerance),
            );
        }
        if !(0.0..1.0).contains(&self.momentum) {
            push(
                "momentum",
                format!("must be in [0, 1), got {}", self.momentum),
            );
        }
        if !(self.initial_decay > 0.0 && self.initial_decay <= 1.0) {
            push(
                "initialDecay",
                format!("must be in (0, 1], got {}", self.initial_decay),
            );
        }

        violations
    }

    /// Checks every range, reporting the first violation.
    pub fn validate(&self) -> MathResult<()> {
        match self.violations().into_iter().next() {
            Some(v) => Err(MathError::invalid_config(v.field, v.message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Rosenbrock;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.momentum, 0.0);
        assert!(!config.adaptive_learning_rate);
        assert_eq!(config.initial_decay, 0.99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_function() {
        let config = OptimizerConfig::for_function(&Rosenbrock);
        assert_eq!(config.learning_rate, 0.001);
    }

    #[test]
    fn test_effective_learning_rate() {
        let config = OptimizerConfig::default().with_learning_rate(0.1);
        assert_eq!(config.effective_learning_rate(50), 0.1);

        let config = config.with_decay(0.5);
        assert_eq!(config.effective_learning_rate(0), 0.1);
        assert_relative_eq!(config.effective_learning_rate(1), 0.05);
        assert_relative_eq!(config.effective_learning_rate(3), 0.0125);
    }

    #[test]
    fn test_validation_ranges() {
        let base = OptimizerConfig::default();
        let bad = [
            (base.with_learning_rate(0.0), "learningRate"),
            (base.with_learning_rate(f64::INFINITY), "learningRate"),
            (base.with_max_iterations(0), "maxIterations"),
            (base.with_tolerance(-1.0), "tolerance"),
            (base.with_tolerance(f64::NAN), "tolerance"),
            (base.with_momentum(1.0), "momentum"),
            (base.with_momentum(-0.1), "momentum"),
            (base.with_decay(0.0), "initialDecay"),
            (base.with_decay(1.5), "initialDecay"),
        ];
        for (config, field) in bad {
            match config.validate() {
                Err(MathError::InvalidConfig { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected {field} violation, got {other:?}"),
            }
        }

        assert!(base.with_tolerance(0.0).validate().is_ok());
        assert!(base.with_momentum(0.99).validate().is_ok());
        assert!(base.with_decay(1.0).validate().is_ok());
    }

    #[test]
    fn test_collects_every_violation() {
        let config = OptimizerConfig::default()
            .with_learning_rate(-1.0)
            .with_momentum(2.0);
        let fields: Vec<_> = config.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["learningRate", "momentum"]);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(OptimizerConfig::default()).unwrap();
        assert_eq!(json["learningRate"], 0.01);
        assert_eq!(json["maxIterations"], 1000);
        assert_eq!(json["adaptiveLearningRate"], false);
        assert_eq!(json["initialDecay"], 0.99);

        let partial: OptimizerConfig =
            serde_json::from_str(r#"{"learningRate": 0.2, "momentum": 0.9}"#).unwrap();
        assert_eq!(partial.learning_rate, 0.2);
        assert_eq!(partial.momentum, 0.9);
        assert_eq!(partial.max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
