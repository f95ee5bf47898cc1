use minimap_blobs::BlobFilterParams;
use minimap_core::{ColorRange, Hsv};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Primary,
    Secondary,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKind::Primary => f.write_str("primary"),
            MarkerKind::Secondary => f.write_str("secondary"),
        }
    }
}

/// Colour and shape bounds for one marker type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerParams {
    /// Non-wrapping ranges whose masks are unioned.
    pub ranges: Vec<ColorRange>,
    /// Minimum blob diameter (px).
    pub min_size: f32,
    /// Maximum blob diameter (px).
    pub max_size: f32,
    pub min_circularity: f32,
}

impl MarkerParams {
    fn validate(&self, marker: MarkerKind) -> Result<(), ConfigError> {
        for (index, range) in self.ranges.iter().enumerate() {
            range.validate().map_err(|source| ConfigError::Range {
                marker,
                index,
                source,
            })?;
        }
        let (min, max) = (self.min_size, self.max_size);
        if !(min > 0.0 && max > 0.0 && min.is_finite() && max.is_finite()) {
            return Err(ConfigError::NonPositiveSize { marker, min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedSize { marker, min, max });
        }
        let c = self.min_circularity;
        if !(c > 0.0 && c <= 1.0) {
            return Err(ConfigError::InvalidCircularity { marker, value: c });
        }
        Ok(())
    }
}

/// Everything one detection call needs. Validated once, then read-only.
///
/// Missing fields in a serialized document take their [`Default`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub primary: MarkerParams,
    pub secondary: MarkerParams,
    pub min_aspect_ratio: f32,
    pub max_aspect_ratio: f32,
    /// Secondary blobs whose centroids are within this distance (px) are one marker.
    pub dedup_distance: f32,
    /// EMA weight of the newest primary position, in (0, 1].
    pub smoothing_alpha: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            primary: MarkerParams {
                ranges: vec![ColorRange::new(Hsv::new(20, 100, 150), Hsv::new(35, 255, 255))],
                min_size: 3.0,
                max_size: 15.0,
                min_circularity: 0.6,
            },
            secondary: MarkerParams {
                ranges: ColorRange::wrapping(Hsv::new(170, 120, 120), Hsv::new(10, 255, 255)),
                min_size: 3.0,
                max_size: 15.0,
                min_circularity: 0.5,
            },
            min_aspect_ratio: 0.5,
            max_aspect_ratio: 2.0,
            dedup_distance: 5.0,
            smoothing_alpha: 0.3,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary.ranges.is_empty() {
            return Err(ConfigError::EmptyPrimaryRanges);
        }
        self.primary.validate(MarkerKind::Primary)?;
        self.secondary.validate(MarkerKind::Secondary)?;

        let (min, max) = (self.min_aspect_ratio, self.max_aspect_ratio);
        if !(min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidAspectRatio { min, max });
        }
        if !(self.dedup_distance > 0.0 && self.dedup_distance.is_finite()) {
            return Err(ConfigError::InvalidDedupDistance(self.dedup_distance));
        }
        let a = self.smoothing_alpha;
        if !(a > 0.0 && a <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(a));
        }
        Ok(())
    }

    pub fn marker(&self, kind: MarkerKind) -> &MarkerParams {
        match kind {
            MarkerKind::Primary => &self.primary,
            MarkerKind::Secondary => &self.secondary,
        }
    }

    /// Blob filter bounds for one marker type.
    pub fn filter_params(&self, kind: MarkerKind) -> BlobFilterParams {
        let marker = self.marker(kind);
        BlobFilterParams {
            min_size: marker.min_size,
            max_size: marker.max_size,
            min_circularity: marker.min_circularity,
            min_aspect_ratio: self.min_aspect_ratio,
            max_aspect_ratio: self.max_aspect_ratio,
        }
    }
}
