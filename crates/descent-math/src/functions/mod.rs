//! Objective functions.
//!
//! | Name | Formula | Minimum | Rate |
//! |------|---------|---------|------|
//! | `quadratic` | x² + y² | (0, 0) | 0.1 |
//! | `elongated` | x² + 10y² | (0, 0) | 0.09 |
//! | `rosenbrock` | (1 - x)² + 100(y - x²)² | (1, 1) | 0.001 |
//! | `himmelblau` | (x² + y - 11)² + (x + y² - 7)² | (3, 2) | 0.01 |
//! | `beale` | Σ (cᵢ - x + xyⁱ)² | (3, 0.5) | 0.001 |
//! | `booth` | (x + 2y - 7)² + (2x + y - 5)² | (1, 3) | 0.05 |
//! | `matyas` | 0.26(x² + y²) - 0.48xy | (0, 0) | 0.5 |
//! | `three_hump_camel` | 2x² - 1.05x⁴ + x⁶/6 + xy + y² | (0, 0) | 0.05 |
//! | `rastrigin` | 20 + Σ (v² - 10cos(2πv)) | (0, 0) | 0.002 |
//! | `saddle` | x² - y² | none | 0.05 |
//!
//! User-defined surfaces are built with [`CustomFunction`] and can be added
//! to a [`FunctionRegistry`] alongside the built-ins.

mod builtin;
mod custom;
mod registry;

pub use builtin::{
    builtin, Beale, Booth, Himmelblau, Matyas, Quadratic, Rastrigin, Rosenbrock, Saddle,
    ThreeHumpCamel, BUILTIN_NAMES,
};
pub use custom::{CustomFunction, DEFAULT_CUSTOM_LEARNING_RATE};
pub use registry::FunctionRegistry;
