use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tolerance::ToleranceMode;

/// A stored waypoint in region-local pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeparturePoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub tolerance_mode: ToleranceMode,
    /// Pixels, for the modes that use it.
    #[serde(default = "default_tolerance")]
    pub tolerance_value: f32,
}

fn default_tolerance() -> f32 {
    5.0
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DeparturePointError {
    #[error("departure point {name:?}: position ({x}, {y}) is not finite")]
    NonFinitePosition { name: String, x: f32, y: f32 },
    #[error(
        "departure point {name:?}: tolerance {value} must be finite and non-negative for mode {mode}"
    )]
    InvalidTolerance {
        name: String,
        mode: ToleranceMode,
        value: f32,
    },
}

impl DeparturePoint {
    pub fn new(
        name: impl Into<String>,
        x: f32,
        y: f32,
        mode: ToleranceMode,
        tolerance: f32,
    ) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            tolerance_mode: mode,
            tolerance_value: tolerance,
        }
    }

    #[inline]
    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }

    pub fn validate(&self) -> Result<(), DeparturePointError> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(DeparturePointError::NonFinitePosition {
                name: self.name.clone(),
                x: self.x,
                y: self.y,
            });
        }
        let tol = self.tolerance_value;
        if self.tolerance_mode.uses_tolerance() && !(tol.is_finite() && tol >= 0.0) {
            return Err(DeparturePointError::InvalidTolerance {
                name: self.name.clone(),
                mode: self.tolerance_mode,
                value: tol,
            });
        }
        Ok(())
    }

    /// Whether `pos` satisfies this point's tolerance mode.
    pub fn is_hit_by(&self, pos: Point2<f32>) -> bool {
        let d = pos - self.position();
        self.tolerance_mode.accepts(d.x, d.y, self.tolerance_value)
    }
}
