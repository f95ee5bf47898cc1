//! Minimap marker detection.
//!
//! One [`DetectionEngine`] call runs, for each marker type:
//! colour mask → 3×3 open/close → blob extraction → shape filter, then picks
//! the primary marker closest to the region centre, smooths its position with
//! an EMA, and counts secondary markers after merging near-coincident blobs.
//!
//! The smoother is the only state that survives between calls. It belongs to
//! one engine; run one engine per active configuration.

mod engine;
mod error;
mod params;
mod result;
mod select;
mod shared;
mod smoother;

pub use engine::DetectionEngine;
pub use error::ConfigError;
pub use params::{DetectorConfig, MarkerKind, MarkerParams};
pub use result::{DetectionDebug, DetectionResult, PrimaryMarker, SecondaryMarkers};
pub use select::{dedup_secondary, select_primary};
pub use shared::SharedDetectorConfig;
pub use smoother::TemporalSmoother;
