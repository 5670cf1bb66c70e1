//! Descent Configuration Layer
//!
//! This crate provides run configuration for the Descent gradient descent
//! playground: which surface to descend, where to start, and how the
//! optimizer should step.
//!
//! # Features
//!
//! - **Run Configuration**: Function or expression, start point, optimizer
//!   settings and animation pacing in one serializable [`RunConfig`]
//! - **Validation**: Every problem in a configuration is reported at once
//!   through the [`Validate`] trait
//! - **Presets**: A thread-safe [`ConfigManager`] preloaded with read-only
//!   standard runs
//! - **Files**: JSON and TOML loading and saving, picked by extension
//!
//! # Example
//!
//! ```rust
//! use descent_config::{ConfigManager, RunConfig};
//!
//! let manager = ConfigManager::new();
//!
//! // Build an optimizer from a standard preset
//! let mut optimizer = manager.get("bowl").unwrap().build().unwrap();
//! optimizer.run_to_convergence().unwrap();
//! assert!(optimizer.is_converged());
//!
//! // Or describe a run on a custom surface
//! let ripple = RunConfig::new("ripple", "ripple", 0.5, 0.5)
//!     .with_expression("sin(x) * cos(y) + 0.1 * (x^2 + y^2)");
//! manager.register(ripple).unwrap();
//! ```
//!
//! # Standard Presets
//!
//! - `bowl` - unit quadratic, converges quickly
//! - `rosenbrock-momentum` - banana valley with momentum 0.9
//! - `himmelblau-decay` - four minima, decaying learning rate
//! - `rastrigin-trap` - plain descent stuck in a local minimum
//! - `beale` - flat plateau with light momentum
//! - `booth` - well-conditioned quadratic
//! - `unstable-bowl` - learning rate past the stability limit

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod loader;
mod manager;
mod run;

// Re-export core types
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{load_run_config, parse_run_config, save_run_config, ConfigFormat};
pub use manager::ConfigManager;
pub use run::RunConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::loader::{load_run_config, save_run_config};
    pub use crate::manager::ConfigManager;
    pub use crate::run::RunConfig;
}
