//! Operator-driven colour calibration for minimap markers.
//!
//! An operator clicks on a marker in a handful of frames. Each click
//! contributes the HSV values of its 3×3 neighbourhood to a shared pool; the
//! derived [`ColorRange`] spans the pool's lower and upper percentiles plus a
//! safety margin, and a preview mask of the first frame lets the operator
//! confirm the range before it is committed elsewhere.
//!
//! ```
//! use minimap_calibrate::{CalibrationEngine, CalibrationSample};
//! use minimap_core::{Hsv, HsvImage};
//!
//! let mut frame = HsvImage::filled(32, 16, Hsv::new(100, 30, 40));
//! frame.fill_disk(10, 8, 2, Hsv::new(28, 220, 230));
//!
//! let samples = [CalibrationSample::new(frame.view(), 10, 8)];
//! let outcome = CalibrationEngine::default().calibrate(&samples).unwrap();
//! assert!(outcome.range.contains(Hsv::new(28, 220, 230)));
//! assert!(!outcome.range.contains(Hsv::new(100, 30, 40)));
//! ```
//!
//! [`ColorRange`]: minimap_core::ColorRange

mod engine;
mod error;
mod percentile;
mod sample;

pub use engine::{CalibrationEngine, CalibrationOutcome, CalibrationParams, RECOMMENDED_SAMPLES};
pub use error::CalibrationError;
pub use percentile::{percentile, ChannelPercentiles};
pub use sample::CalibrationSample;
