//! Descriptive metadata attached to objective functions.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// Known global minimiser of an objective function.
///
/// Informational only; the optimizer never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalMinimum {
    /// Horizontal coordinate of the minimiser.
    pub x: f64,
    /// Vertical coordinate of the minimiser.
    pub y: f64,
    /// Function value at the minimiser.
    pub value: f64,
}

impl GlobalMinimum {
    /// Creates a new global minimum record.
    #[must_use]
    pub const fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// The minimiser as a point.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Name and description of a function, as embedded in exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    /// Registry name.
    pub name: String,
    /// Human-readable description, usually the formula.
    pub description: String,
}

impl FunctionInfo {
    /// Creates function metadata.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
