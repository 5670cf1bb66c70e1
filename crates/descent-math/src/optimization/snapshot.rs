//! Optimizer state, lifecycle phase and history records.

use std::fmt;

use chrono::{DateTime, Utc};
use descent_core::serde_util::nullable_f64;
use descent_core::{ObjectiveFunction, Vec2};
use serde::{Deserialize, Serialize};

/// Lifecycle of an optimizer run.
///
/// ```text
/// Uninitialized --initialize--> Running --|g| < tol--> Converged
///                                  \------iteration = max--> Exhausted
/// ```
///
/// `Converged` and `Exhausted` are terminal for stepping; only a fresh
/// `initialize` returns to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No start point yet.
    #[default]
    Uninitialized,
    /// Stepping.
    Running,
    /// Gradient magnitude fell below tolerance.
    Converged,
    /// Iteration ceiling reached without converging.
    Exhausted,
}

impl Phase {
    /// Returns true for `Converged` and `Exhausted`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Converged | Phase::Exhausted)
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Running => "running",
            Phase::Converged => "converged",
            Phase::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable iterate owned by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerState {
    /// Current point.
    pub position: Vec2,
    /// Momentum velocity; stays zero without momentum.
    pub velocity: Vec2,
    /// Number of position updates so far.
    pub iteration: u32,
    /// Set once the gradient magnitude falls below tolerance.
    pub converged: bool,
}

impl OptimizerState {
    /// Fresh state at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Immutable record of the optimizer at one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Point at this iteration.
    pub position: Vec2,
    /// `f(position)`.
    #[serde(deserialize_with = "nullable_f64")]
    pub function_value: f64,
    /// `∇f(position)`.
    pub gradient: Vec2,
    /// Euclidean norm of the gradient.
    #[serde(deserialize_with = "nullable_f64")]
    pub gradient_magnitude: f64,
    /// Iteration number; equals the snapshot's index in the history.
    pub iteration: u32,
    /// Convergence flag at capture time.
    pub converged: bool,
    /// Learning rate associated with this iteration.
    #[serde(deserialize_with = "nullable_f64")]
    pub learning_rate: f64,
    /// Wall-clock capture time.
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Evaluates `function` at the state's position and records the result.
    pub fn capture(
        function: &dyn ObjectiveFunction,
        state: &OptimizerState,
        learning_rate: f64,
    ) -> Self {
        let gradient = function.gradient_at(state.position);
        Self {
            position: state.position,
            function_value: function.value_at(state.position),
            gradient,
            gradient_magnitude: gradient.norm(),
            iteration: state.iteration,
            converged: state.converged,
            learning_rate,
            timestamp: Utc::now(),
        }
    }

    /// Returns true if position, value and gradient are all finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.function_value.is_finite() && self.gradient.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Quadratic;

    #[test]
    fn test_phase_terminal() {
        assert!(!Phase::Uninitialized.is_terminal());
        assert!(!Phase::Running.is_terminal());
        assert!(Phase::Converged.is_terminal());
        assert!(Phase::Exhausted.is_terminal());
        assert_eq!(Phase::Exhausted.to_string(), "exhausted");
        assert_eq!(serde_json::to_string(&Phase::Converged).unwrap(), "\"converged\"");
    }

    #[test]
    fn test_capture() {
        let state = OptimizerState::at(Vec2::new(2.0, 2.0));
        let snap = Snapshot::capture(&Quadratic::centered(1.0, 1.0), &state, 0.1);
        assert_eq!(snap.function_value, 2.0);
        assert_eq!(snap.gradient, Vec2::new(2.0, 2.0));
        assert_eq!(snap.gradient_magnitude, 8.0_f64.sqrt());
        assert_eq!(snap.iteration, 0);
        assert!(!snap.converged);
        assert!(snap.is_finite());
    }

    #[test]
    fn test_wire_names() {
        let state = OptimizerState::at(Vec2::new(1.0, 0.0));
        let snap = Snapshot::capture(&Quadratic::new(), &state, 0.1);
        let json = serde_json::to_value(&snap).unwrap();
        for key in [
            "position",
            "functionValue",
            "gradient",
            "gradientMagnitude",
            "iteration",
            "converged",
            "learningRate",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
