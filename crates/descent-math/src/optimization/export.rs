//! Export bundle for persistence and offline analysis.

use descent_core::FunctionInfo;
use serde::{Deserialize, Serialize};

use super::config::OptimizerConfig;
use super::snapshot::Snapshot;
use super::statistics::Statistics;
use crate::error::{MathError, MathResult};

/// Everything needed to replay or analyse a run.
///
/// Serialized as `{config, history, statistics, functionInfo}`. Non-finite
/// numbers become `null` and read back as NaN, so a bundle from a diverged
/// run loads with its degenerate values intact (infinities lose their sign).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    /// Settings the run used.
    pub config: OptimizerConfig,
    /// Every recorded snapshot, oldest first.
    pub history: Vec<Snapshot>,
    /// Run summary; `None` before `initialize`.
    pub statistics: Option<Statistics>,
    /// Name and description of the objective.
    pub function_info: FunctionInfo,
}

impl ExportData {
    /// Compact JSON.
    pub fn to_json(&self) -> MathResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> MathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a bundle written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> MathResult<Self> {
        serde_json::from_str(json).map_err(|e| MathError::Deserialization(e.to_string()))
    }
}
