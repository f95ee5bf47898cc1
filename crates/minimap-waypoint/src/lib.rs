//! Departure points: stored minimap waypoints and the rules for deciding
//! whether a live position has reached one.

mod matcher;
mod point;
mod tolerance;

pub use matcher::{hits, is_hit};
pub use point::{DeparturePoint, DeparturePointError};
pub use tolerance::{ParseToleranceModeError, ToleranceMode};
