//! Domain types for gradient descent on bivariate surfaces.
//!
//! - [`Vec2`]: Planar vector used for positions, velocities and gradients
//! - [`Bounds`]: Square plotting domain of an objective function
//! - [`GlobalMinimum`]: Known minimiser of an objective function
//! - [`FunctionInfo`]: Name and description carried into exports

mod bounds;
mod metadata;
mod vec2;

pub use bounds::Bounds;
pub use metadata::{FunctionInfo, GlobalMinimum};
pub use vec2::Vec2;
