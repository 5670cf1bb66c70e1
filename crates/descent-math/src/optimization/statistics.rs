//! Run summary statistics.

use std::time::Duration;

use descent_core::serde_util::nullable_f64;
use serde::{Deserialize, Serialize};

use super::snapshot::Snapshot;

/// Summary of a run, derived from its history.
///
/// Degenerate inputs are reported as-is: an initial value of zero makes
/// `improvement_percent` NaN or infinite, and a diverged run has
/// non-finite values. JSON encodes those as `null`, which reads back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Position updates performed.
    pub iterations: u32,
    /// Whether the run converged.
    pub converged: bool,
    /// Function value of the first history record.
    #[serde(deserialize_with = "nullable_f64")]
    pub initial_value: f64,
    /// Function value of the last history record.
    #[serde(deserialize_with = "nullable_f64")]
    pub final_value: f64,
    /// `initial_value - final_value`.
    #[serde(deserialize_with = "nullable_f64")]
    pub improvement: f64,
    /// `improvement / |initial_value| * 100`.
    #[serde(deserialize_with = "nullable_f64")]
    pub improvement_percent: f64,
    /// Wall-clock time from the first step to convergence or exhaustion.
    #[serde(rename = "executionTime", deserialize_with = "nullable_f64")]
    pub execution_time_ms: f64,
    /// `execution_time_ms / iterations`, or 0 before the first update.
    #[serde(rename = "averageStepTime", deserialize_with = "nullable_f64")]
    pub average_step_time_ms: f64,
}

impl Statistics {
    /// Derives statistics from a history, or `None` if it is empty.
    pub fn from_history(
        history: &[Snapshot],
        iterations: u32,
        converged: bool,
        elapsed: Duration,
    ) -> Option<Self> {
        let first = history.first()?;
        let last = history.last()?;

        let initial_value = first.function_value;
        let final_value = last.function_value;
        let improvement = initial_value - final_value;
        let execution_time_ms = elapsed.as_secs_f64() * 1000.0;
        let average_step_time_ms = if iterations == 0 {
            0.0
        } else {
            execution_time_ms / f64::from(iterations)
        };

        Some(Self {
            iterations,
            converged,
            initial_value,
            final_value,
            improvement,
            improvement_percent: improvement / initial_value.abs() * 100.0,
            execution_time_ms,
            average_step_time_ms,
        })
    }
}
