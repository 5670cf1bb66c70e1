//! # Descent Math
//!
//! Numerical core of the Descent gradient descent playground.
//!
//! This crate provides:
//!
//! - **Functions**: Classic optimization test surfaces with closed-form
//!   gradients (Rosenbrock, Himmelblau, Beale, Rastrigin, ...) and a
//!   name-based [`FunctionRegistry`]
//! - **Expressions**: A small compiler for user-defined surfaces such as
//!   `sin(x) * cos(y) + 0.1 * (x^2 + y^2)`, evaluated from bytecode
//! - **Gradients**: Central finite differences for surfaces without a
//!   closed-form gradient
//! - **Optimization**: A step-driven gradient descent [`Optimizer`] with
//!   optional momentum and learning-rate decay, full step history,
//!   convergence detection, statistics and JSON export
//!
//! ## Design Philosophy
//!
//! - **Caller-Driven**: The optimizer never loops on its own unless asked;
//!   hosts drive it one step or one chunk at a time
//! - **Observable Degeneracy**: NaN and infinities flow into the history
//!   instead of aborting a run
//! - **No Code Evaluation**: User expressions are parsed against a fixed
//!   grammar and function set
//!
//! ## Example
//!
//! ```rust
//! use descent_math::prelude::*;
//!
//! let function = builtin("quadratic").unwrap();
//! let config = OptimizerConfig::default().with_learning_rate(0.1);
//! let mut optimizer = Optimizer::new(function, config).unwrap();
//!
//! optimizer.initialize(3.0, -2.0);
//! optimizer.run_to_convergence().unwrap();
//!
//! let stats = optimizer.statistics().unwrap();
//! assert!(stats.converged);
//! assert!(stats.final_value < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod expression;
pub mod functions;
pub mod gradient;
pub mod optimization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::expression::{CompiledExpression, ExpressionError};
    pub use crate::functions::{
        builtin, Beale, Booth, CustomFunction, FunctionRegistry, Himmelblau, Matyas, Quadratic,
        Rastrigin, Rosenbrock, Saddle, ThreeHumpCamel,
    };
    pub use crate::gradient::{central_difference, numerical_gradient, DEFAULT_GRADIENT_STEP};
    pub use crate::optimization::{
        ExportData, Optimizer, OptimizerConfig, OptimizerState, Phase, Snapshot, Statistics,
    };
    pub use descent_core::prelude::*;
}

pub use error::{MathError, MathResult};
pub use functions::{builtin, CustomFunction, FunctionRegistry};
pub use optimization::{ExportData, Optimizer, OptimizerConfig, Phase, Snapshot, Statistics};
