//! Numerical gradients.
//!
//! Surfaces without a closed-form gradient are differentiated with the
//! symmetric (central) difference
//!
//! ```text
//! ∂f/∂x ≈ (f(x + h, y) - f(x - h, y)) / 2h
//! ```
//!
//! whose truncation error is O(h²) for smooth functions. Near kinks, or
//! where `f` is non-finite, the estimate degrades and is returned as-is.

use descent_core::{ObjectiveFunction, Vec2};

/// Default finite-difference step.
pub const DEFAULT_GRADIENT_STEP: f64 = 1e-6;

/// Central-difference gradient of `f` at `(x, y)` with step `h`.
///
/// # Example
///
/// ```rust
/// use descent_math::gradient::central_difference;
///
/// let g = central_difference(|x, y| x * x + 3.0 * y, 2.0, 0.0, 1e-6);
/// assert!((g.x - 4.0).abs() < 1e-6);
/// assert!((g.y - 3.0).abs() < 1e-6);
/// ```
#[inline]
pub fn central_difference<F>(f: F, x: f64, y: f64, h: f64) -> Vec2
where
    F: Fn(f64, f64) -> f64,
{
    let two_h = 2.0 * h;
    Vec2::new(
        (f(x + h, y) - f(x - h, y)) / two_h,
        (f(x, y + h) - f(x, y - h)) / two_h,
    )
}

/// Central-difference gradient of an objective function's value surface.
///
/// Ignores the function's own `gradient`; useful for checking closed forms.
pub fn numerical_gradient(function: &dyn ObjectiveFunction, x: f64, y: f64, h: f64) -> Vec2 {
    central_difference(|px, py| function.value(px, py), x, y, h)
}
