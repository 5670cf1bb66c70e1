//! Built-in test surfaces with closed-form gradients.

use std::f64::consts::PI;
use std::sync::Arc;

use descent_core::{Bounds, GlobalMinimum, ObjectiveFunction, Vec2};

use crate::error::{MathError, MathResult};

/// Registry names of every built-in surface, in listing order.
pub const BUILTIN_NAMES: &[&str] = &[
    "quadratic",
    "elongated",
    "rosenbrock",
    "himmelblau",
    "beale",
    "booth",
    "matyas",
    "three_hump_camel",
    "rastrigin",
    "saddle",
];

/// Looks up a built-in surface by registry name.
///
/// # Example
///
/// ```rust
/// use descent_math::prelude::*;
///
/// let f = builtin("himmelblau").unwrap();
/// assert_eq!(f.value(3.0, 2.0), 0.0);
/// assert!(builtin("nope").is_err());
/// ```
pub fn builtin(name: &str) -> MathResult<Arc<dyn ObjectiveFunction>> {
    let function: Arc<dyn ObjectiveFunction> = match name {
        "quadratic" => Arc::new(Quadratic::new()),
        "elongated" => Arc::new(Quadratic::elongated()),
        "rosenbrock" => Arc::new(Rosenbrock),
        "himmelblau" => Arc::new(Himmelblau),
        "beale" => Arc::new(Beale),
        "booth" => Arc::new(Booth),
        "matyas" => Arc::new(Matyas),
        "three_hump_camel" => Arc::new(ThreeHumpCamel),
        "rastrigin" => Arc::new(Rastrigin::default()),
        "saddle" => Arc::new(Saddle),
        _ => return Err(MathError::unknown_function(name, BUILTIN_NAMES)),
    };
    Ok(function)
}

// ============================================================================
// Quadratic bowls
// ============================================================================

/// Axis-aligned quadratic bowl `ax·(x - cx)² + ay·(y - cy)²`.
///
/// With unit scales this is the textbook convex bowl; unequal scales give an
/// ill-conditioned valley where plain gradient descent zig-zags.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic {
    name: String,
    description: String,
    center: Vec2,
    scale: Vec2,
    learning_rate: f64,
}

impl Quadratic {
    /// The unit bowl `x² + y²`.
    pub fn new() -> Self {
        Self {
            name: "quadratic".into(),
            description: "x^2 + y^2".into(),
            center: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            learning_rate: 0.1,
        }
    }

    /// Unit bowl with its minimum at `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64) -> Self {
        let mut bowl = Self {
            center: Vec2::new(cx, cy),
            ..Self::new()
        };
        bowl.describe();
        bowl
    }

    /// The ill-conditioned bowl `x² + 10y²`.
    pub fn elongated() -> Self {
        Self {
            name: "elongated".into(),
            description: "x^2 + 10y^2".into(),
            center: Vec2::ZERO,
            scale: Vec2::new(1.0, 10.0),
            // Just under the 2/L stability limit, L = 20
            learning_rate: 0.09,
        }
    }

    /// Replaces the per-axis curvature scales.
    pub fn with_scale(mut self, ax: f64, ay: f64) -> Self {
        self.scale = Vec2::new(ax, ay);
        self.describe();
        self
    }

    /// Center of the bowl.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    fn describe(&mut self) {
        self.description = format!(
            "{} + {}",
            square_term('x', self.center.x, self.scale.x),
            square_term('y', self.center.y, self.scale.y)
        );
    }
}

/// `w(v - c)^2` with the offset sign folded in and unit factors dropped.
fn square_term(var: char, offset: f64, weight: f64) -> String {
    let base = if offset == 0.0 {
        var.to_string()
    } else if offset < 0.0 {
        format!("({var} + {})", -offset)
    } else {
        format!("({var} - {offset})")
    };

    if weight == 1.0 {
        format!("{base}^2")
    } else {
        format!("{weight}{base}^2")
    }
}

impl Default for Quadratic {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectiveFunction for Quadratic {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        self.scale.x * dx * dx + self.scale.y * dy * dy
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            2.0 * self.scale.x * (x - self.center.x),
            2.0 * self.scale.y * (y - self.center.y),
        )
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(5.0 + self.center.x.abs().max(self.center.y.abs()))
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(self.center.x, self.center.y, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

// ============================================================================
// Classic test functions
// ============================================================================

/// Rosenbrock's banana valley `(1 - x)² + 100(y - x²)²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rosenbrock;

impl ObjectiveFunction for Rosenbrock {
    fn name(&self) -> &str {
        "rosenbrock"
    }

    fn description(&self) -> &str {
        "(1 - x)^2 + 100(y - x^2)^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let a = 1.0 - x;
        let b = y - x * x;
        a * a + 100.0 * b * b
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let b = y - x * x;
        Vec2::new(-2.0 * (1.0 - x) - 400.0 * x * b, 200.0 * b)
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(2.0)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(1.0, 1.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.001
    }
}

/// Himmelblau's function `(x² + y - 11)² + (x + y² - 7)²`.
///
/// Four identical minima; `(3, 2)` is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Himmelblau;

impl ObjectiveFunction for Himmelblau {
    fn name(&self) -> &str {
        "himmelblau"
    }

    fn description(&self) -> &str {
        "(x^2 + y - 11)^2 + (x + y^2 - 7)^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let a = x * x + y - 11.0;
        let b = x + y * y - 7.0;
        a * a + b * b
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let a = x * x + y - 11.0;
        let b = x + y * y - 7.0;
        Vec2::new(4.0 * x * a + 2.0 * b, 2.0 * a + 4.0 * y * b)
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(5.0)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(3.0, 2.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.01
    }
}

/// Beale's function, a flat plateau with steep ridges near the corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Beale;

impl ObjectiveFunction for Beale {
    fn name(&self) -> &str {
        "beale"
    }

    fn description(&self) -> &str {
        "(1.5 - x + xy)^2 + (2.25 - x + xy^2)^2 + (2.625 - x + xy^3)^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let (t1, t2, t3) = beale_terms(x, y);
        t1 * t1 + t2 * t2 + t3 * t3
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let (t1, t2, t3) = beale_terms(x, y);
        let y2 = y * y;
        let y3 = y2 * y;
        Vec2::new(
            2.0 * t1 * (y - 1.0) + 2.0 * t2 * (y2 - 1.0) + 2.0 * t3 * (y3 - 1.0),
            2.0 * t1 * x + 4.0 * t2 * x * y + 6.0 * t3 * x * y2,
        )
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(4.5)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(3.0, 0.5, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.001
    }
}

#[inline]
fn beale_terms(x: f64, y: f64) -> (f64, f64, f64) {
    (
        1.5 - x + x * y,
        2.25 - x + x * y * y,
        2.625 - x + x * y * y * y,
    )
}

/// Booth's function `(x + 2y - 7)² + (2x + y - 5)²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Booth;

impl ObjectiveFunction for Booth {
    fn name(&self) -> &str {
        "booth"
    }

    fn description(&self) -> &str {
        "(x + 2y - 7)^2 + (2x + y - 5)^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let a = x + 2.0 * y - 7.0;
        let b = 2.0 * x + y - 5.0;
        a * a + b * b
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let a = x + 2.0 * y - 7.0;
        let b = 2.0 * x + y - 5.0;
        Vec2::new(2.0 * a + 4.0 * b, 4.0 * a + 2.0 * b)
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(10.0)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(1.0, 3.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.05
    }
}

/// Matyas function `0.26(x² + y²) - 0.48xy`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Matyas;

impl ObjectiveFunction for Matyas {
    fn name(&self) -> &str {
        "matyas"
    }

    fn description(&self) -> &str {
        "0.26(x^2 + y^2) - 0.48xy"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        0.26 * (x * x + y * y) - 0.48 * x * y
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(0.52 * x - 0.48 * y, 0.52 * y - 0.48 * x)
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(10.0)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(0.0, 0.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.5
    }
}

/// Three-hump camel `2x² - 1.05x⁴ + x⁶/6 + xy + y²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreeHumpCamel;

impl ObjectiveFunction for ThreeHumpCamel {
    fn name(&self) -> &str {
        "three_hump_camel"
    }

    fn description(&self) -> &str {
        "2x^2 - 1.05x^4 + x^6/6 + xy + y^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let x2 = x * x;
        2.0 * x2 - 1.05 * x2 * x2 + x2 * x2 * x2 / 6.0 + x * y + y * y
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let x2 = x * x;
        Vec2::new(
            4.0 * x - 4.2 * x2 * x + x2 * x2 * x + y,
            x + 2.0 * y,
        )
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(5.0)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(0.0, 0.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.05
    }
}

/// Rastrigin's function `2A + Σ (v² - A·cos(2πv))`, a lattice of local minima.
#[derive(Debug, Clone, PartialEq)]
pub struct Rastrigin {
    amplitude: f64,
    description: String,
}

impl Rastrigin {
    /// Rastrigin surface with ripple amplitude `A`.
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude,
            description: format!(
                "{} + x^2 - {amplitude}cos(2πx) + y^2 - {amplitude}cos(2πy)",
                2.0 * amplitude
            ),
        }
    }
}

impl Default for Rastrigin {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl ObjectiveFunction for Rastrigin {
    fn name(&self) -> &str {
        "rastrigin"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        let a = self.amplitude;
        2.0 * a + x * x - a * (2.0 * PI * x).cos() + y * y - a * (2.0 * PI * y).cos()
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        let k = 2.0 * PI * self.amplitude;
        Vec2::new(
            2.0 * x + k * (2.0 * PI * x).sin(),
            2.0 * y + k * (2.0 * PI * y).sin(),
        )
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(5.12)
    }

    fn global_minimum(&self) -> Option<GlobalMinimum> {
        Some(GlobalMinimum::new(0.0, 0.0, 0.0))
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.002
    }
}

/// Saddle `x² - y²`. Unbounded below, so it has no global minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Saddle;

impl ObjectiveFunction for Saddle {
    fn name(&self) -> &str {
        "saddle"
    }

    fn description(&self) -> &str {
        "x^2 - y^2"
    }

    fn value(&self, x: f64, y: f64) -> f64 {
        x * x - y * y
    }

    fn gradient(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(2.0 * x, -2.0 * y)
    }

    fn bounds(&self) -> Bounds {
        Bounds::symmetric(3.0)
    }

    fn recommended_learning_rate(&self) -> f64 {
        0.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::numerical_gradient;
    use approx::assert_abs_diff_eq;

    const SAMPLE_POINTS: &[(f64, f64)] = &[
        (0.5, -0.3),
        (-1.2, 0.8),
        (1.3, 1.7),
        (-0.4, -1.1),
        (2.0, 0.25),
    ];

    fn all() -> Vec<Arc<dyn ObjectiveFunction>> {
        BUILTIN_NAMES.iter().map(|n| builtin(n).unwrap()).collect()
    }

    #[test]
    fn test_names_match_lookup() {
        for name in BUILTIN_NAMES {
            assert_eq!(builtin(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_unknown_name_lists_builtins() {
        let err = builtin("ackley").unwrap_err();
        match err {
            MathError::UnknownFunction { name, available } => {
                assert_eq!(name, "ackley");
                assert_eq!(available.len(), BUILTIN_NAMES.len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_gradient_vanishes_at_global_minimum() {
        for f in all() {
            if let Some(min) = f.global_minimum() {
                let g = f.gradient(min.x, min.y);
                assert_abs_diff_eq!(g.x, 0.0, epsilon = 1e-10);
                assert_abs_diff_eq!(g.y, 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_value_at_global_minimum() {
        for f in all() {
            if let Some(min) = f.global_minimum() {
                assert_abs_diff_eq!(f.value(min.x, min.y), min.value, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_closed_form_matches_central_difference() {
        for f in all() {
            for &(x, y) in SAMPLE_POINTS {
                let analytic = f.gradient(x, y);
                let numeric = numerical_gradient(f.as_ref(), x, y, 1e-8);
                assert_abs_diff_eq!(analytic.x, numeric.x, epsilon = 1e-3);
                assert_abs_diff_eq!(analytic.y, numeric.y, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_recommended_rates_are_positive() {
        for f in all() {
            assert!(f.recommended_learning_rate() > 0.0, "{}", f.name());
            assert!(f.bounds().span() > 0.0);
        }
    }

    #[test]
    fn test_centered_quadratic() {
        let bowl = Quadratic::centered(1.0, 1.0);
        assert_eq!(bowl.value(2.0, 2.0), 2.0);
        assert_eq!(bowl.gradient(2.0, 2.0), Vec2::new(2.0, 2.0));
        assert_eq!(bowl.global_minimum().unwrap().position(), Vec2::new(1.0, 1.0));
        assert!(bowl.bounds().contains(1.0, 1.0));
        assert_eq!(bowl.description(), "(x - 1)^2 + (y - 1)^2");
    }

    #[test]
    fn test_quadratic_description_signs() {
        assert_eq!(
            Quadratic::centered(-1.0, 2.5).description(),
            "(x + 1)^2 + (y - 2.5)^2"
        );
        assert_eq!(Quadratic::centered(0.0, -0.5).description(), "x^2 + (y + 0.5)^2");
        assert_eq!(
            Quadratic::centered(-2.0, 0.0).with_scale(3.0, 1.0).description(),
            "3(x + 2)^2 + y^2"
        );
        assert_eq!(
            Quadratic::new().with_scale(1.0, 10.0).description(),
            Quadratic::elongated().description()
        );
    }

    #[test]
    fn test_elongated_is_ill_conditioned() {
        let f = Quadratic::elongated();
        assert_eq!(f.gradient(1.0, 1.0), Vec2::new(2.0, 20.0));
        assert_eq!(Quadratic::new().with_scale(3.0, 1.0).value(1.0, 0.0), 3.0);
    }

    #[test]
    fn test_saddle_has_no_minimum() {
        assert!(Saddle.global_minimum().is_none());
        assert_eq!(
            Rastrigin::default().description(),
            "20 + x^2 - 10cos(2πx) + y^2 - 10cos(2πy)"
        );
        assert_eq!(Saddle.value(1.0, 2.0), -3.0);
    }

    #[test]
    fn test_himmelblau_other_minima() {
        for (x, y) in [
            (-2.805118, 3.131312),
            (-3.779310, -3.283186),
            (3.584428, -1.848126),
        ] {
            assert_abs_diff_eq!(Himmelblau.value(x, y), 0.0, epsilon = 1e-6);
        }
    }
}
