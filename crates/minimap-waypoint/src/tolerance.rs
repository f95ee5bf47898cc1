use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a live position is compared against a departure point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceMode {
    /// Both axes within the tolerance.
    #[default]
    Both,
    XAxis,
    YAxis,
    /// Strictly past the point on the axis; the tolerance is not used.
    XGreater,
    XLess,
    YGreater,
    YLess,
}

impl ToleranceMode {
    pub const ALL: [ToleranceMode; 7] = [
        ToleranceMode::Both,
        ToleranceMode::XAxis,
        ToleranceMode::YAxis,
        ToleranceMode::XGreater,
        ToleranceMode::XLess,
        ToleranceMode::YGreater,
        ToleranceMode::YLess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToleranceMode::Both => "both",
            ToleranceMode::XAxis => "x_axis",
            ToleranceMode::YAxis => "y_axis",
            ToleranceMode::XGreater => "x_greater",
            ToleranceMode::XLess => "x_less",
            ToleranceMode::YGreater => "y_greater",
            ToleranceMode::YLess => "y_less",
        }
    }

    /// Whether `tolerance_value` takes part in the comparison.
    #[inline]
    pub fn uses_tolerance(self) -> bool {
        matches!(
            self,
            ToleranceMode::Both | ToleranceMode::XAxis | ToleranceMode::YAxis
        )
    }

    /// Evaluate the mode for offsets `dx = x - point.x`, `dy = y - point.y`.
    pub fn accepts(self, dx: f32, dy: f32, tolerance: f32) -> bool {
        match self {
            ToleranceMode::Both => dx.abs() <= tolerance && dy.abs() <= tolerance,
            ToleranceMode::XAxis => dx.abs() <= tolerance,
            ToleranceMode::YAxis => dy.abs() <= tolerance,
            ToleranceMode::XGreater => dx > 0.0,
            ToleranceMode::XLess => dx < 0.0,
            ToleranceMode::YGreater => dy > 0.0,
            ToleranceMode::YLess => dy < 0.0,
        }
    }
}

impl fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tolerance mode {0:?}")]
pub struct ParseToleranceModeError(pub String);

impl FromStr for ToleranceMode {
    type Err = ParseToleranceModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseToleranceModeError(s.to_owned()))
    }
}
