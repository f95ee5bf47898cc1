//! High-level facade for the `minimap-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the pipeline crates
//! - the persisted configuration document ([`MinimapConfig`]) with JSON I/O
//! - (feature-gated) helpers that take `image::RgbImage` frames straight into
//!   the detector
//!
//! ## Quickstart
//!
//! ```no_run
//! use minimap::{detect, MinimapConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MinimapConfig::load_json("minimap.json")?;
//! let mut engine = config.build_engine()?;
//!
//! let frame = image::open("frame.png")?.to_rgb8();
//! let region = detect::crop_region(&frame, 1570, 20, 340, 86)?;
//! let result = detect::detect_image(&mut engine, &region);
//!
//! for point in config.hits(result.player_position()) {
//!     println!("reached {}", point.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `minimap::core`: HSV images, colour ranges, masks, morphology.
//! - `minimap::blobs`: connected components, contour descriptors, shape filters.
//! - `minimap::detector`: per-frame detection engine and its configuration.
//! - `minimap::calibrate`: colour ranges from operator click samples.
//! - `minimap::waypoint`: departure points and tolerance matching.
//! - `minimap::detect` (feature `image`): adapters from `image::RgbImage`.

pub use minimap_blobs as blobs;
pub use minimap_calibrate as calibrate;
pub use minimap_core as core;
pub use minimap_detect as detector;
pub use minimap_waypoint as waypoint;

pub use minimap_calibrate::{CalibrationEngine, CalibrationSample};
pub use minimap_core::{ColorRange, Hsv, HsvImage, HsvImageView};
pub use minimap_detect::{DetectionEngine, DetectionResult, DetectorConfig};
pub use minimap_waypoint::{DeparturePoint, ToleranceMode};

mod io;

pub use io::{IoError, MinimapConfig};

#[cfg(feature = "image")]
pub mod detect;
