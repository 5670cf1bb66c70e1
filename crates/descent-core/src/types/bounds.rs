//! Plotting domain of an objective function.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Square domain `[min, max] × [min, max]`.
///
/// Only renderers use the bounds; the optimizer is free to leave them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower edge on both axes.
    pub min: f64,
    /// Upper edge on both axes.
    pub max: f64,
}

impl Bounds {
    /// Creates bounds, rejecting empty, inverted or non-finite ranges.
    pub fn new(min: f64, max: f64) -> CoreResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(CoreError::invalid_bounds(min, max, "edges must be finite"));
        }
        if min >= max {
            return Err(CoreError::invalid_bounds(
                min,
                max,
                "min must be strictly below max",
            ));
        }
        Ok(Self { min, max })
    }

    /// Creates `[-half_width, half_width]`.
    #[must_use]
    pub fn symmetric(half_width: f64) -> Self {
        let h = half_width.abs();
        Self { min: -h, max: h }
    }

    /// Width of the domain along either axis.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Centre of the domain along either axis.
    #[must_use]
    pub fn center(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Returns true if `(x, y)` lies inside the domain (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min && x <= self.max && y >= self.min && y <= self.max
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::symmetric(5.0)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
