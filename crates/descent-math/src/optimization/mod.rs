//! Gradient descent optimization.
//!
//! - [`Optimizer`]: the step-driven state machine
//! - [`OptimizerConfig`]: learning rate, ceiling, tolerance, momentum, decay
//! - [`Snapshot`] / [`OptimizerState`] / [`Phase`]: what a run records
//! - [`Statistics`] / [`ExportData`]: summaries for reporting and persistence

mod config;
mod export;
mod optimizer;
mod snapshot;
mod statistics;

pub use config::{
    ConfigViolation, OptimizerConfig, DEFAULT_INITIAL_DECAY, DEFAULT_LEARNING_RATE,
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
pub use export::ExportData;
pub use optimizer::Optimizer;
pub use snapshot::{OptimizerState, Phase, Snapshot};
pub use statistics::Statistics;
