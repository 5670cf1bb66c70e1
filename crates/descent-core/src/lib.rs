//! # Descent Core
//!
//! Core types and traits for the Descent gradient descent playground.
//!
//! This crate provides the building blocks shared by the optimizer, the
//! configuration layer and the command-line front end:
//!
//! - **Types**: [`Vec2`] for positions, velocities and gradients, [`Bounds`]
//!   for plotting domains, [`GlobalMinimum`] and [`FunctionInfo`] metadata
//! - **Traits**: [`ObjectiveFunction`], the capability set every surface
//!   (built-in or user-defined) implements
//!
//! ## Example
//!
//! ```rust
//! use descent_core::prelude::*;
//!
//! struct Bowl;
//!
//! impl ObjectiveFunction for Bowl {
//!     fn name(&self) -> &str { "bowl" }
//!     fn description(&self) -> &str { "x^2 + y^2" }
//!     fn value(&self, x: f64, y: f64) -> f64 { x * x + y * y }
//!     fn gradient(&self, x: f64, y: f64) -> Vec2 { Vec2::new(2.0 * x, 2.0 * y) }
//!     fn bounds(&self) -> Bounds { Bounds::symmetric(5.0) }
//!     fn recommended_learning_rate(&self) -> f64 { 0.1 }
//! }
//!
//! let bowl = Bowl;
//! assert_eq!(bowl.gradient(1.0, 0.0).norm(), 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod serde_util;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::traits::ObjectiveFunction;
    pub use crate::types::{Bounds, FunctionInfo, GlobalMinimum, Vec2};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use traits::ObjectiveFunction;
pub use types::{Bounds, FunctionInfo, GlobalMinimum, Vec2};
