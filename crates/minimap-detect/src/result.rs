use minimap_blobs::{Blob, FilterStats};
use minimap_core::BinaryMask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Primary marker (operator position) for one call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryMarker {
    pub detected: bool,
    /// Smoothed position; `None` when not detected this call.
    pub position: Option<Point2<f32>>,
    /// Circularity of the accepted raw blob, clamped to `[0, 1]`.
    pub confidence: f32,
}

impl PrimaryMarker {
    pub fn found(position: Point2<f32>, confidence: f32) -> Self {
        Self {
            detected: true,
            position: Some(position),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn not_detected() -> Self {
        Self::default()
    }
}

/// Secondary markers (other actors) for one call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMarkers {
    pub detected: bool,
    pub count: usize,
    /// Mean centroid of every merged group.
    pub positions: Vec<Point2<f32>>,
}

impl SecondaryMarkers {
    pub fn from_positions(positions: Vec<Point2<f32>>) -> Self {
        Self {
            detected: !positions.is_empty(),
            count: positions.len(),
            positions,
        }
    }
}

/// Output of one detection call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub primary: PrimaryMarker,
    pub secondary: SecondaryMarkers,
    /// Milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

impl DetectionResult {
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            ..Self::default()
        }
    }

    /// Smoothed primary position when the primary marker was detected.
    #[inline]
    pub fn player_position(&self) -> Option<Point2<f32>> {
        self.primary.position.filter(|_| self.primary.detected)
    }
}

/// Intermediate products of one call, for tuning and calibration UIs.
#[derive(Clone, Debug, Default)]
pub struct DetectionDebug {
    pub primary_mask: BinaryMask,
    pub secondary_mask: BinaryMask,
    pub primary_blobs: Vec<Blob>,
    pub secondary_blobs: Vec<Blob>,
    pub primary_stats: FilterStats,
    pub secondary_stats: FilterStats,
    /// Centroid of the selected primary blob before smoothing.
    pub raw_primary: Option<Point2<f32>>,
}
