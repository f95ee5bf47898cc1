use minimap_core::ColorRangeError;

use crate::params::MarkerKind;

/// Errors returned when a [`crate::DetectorConfig`] is loaded or committed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{marker} colour range #{index}: {source}")]
    Range {
        marker: MarkerKind,
        index: usize,
        #[source]
        source: ColorRangeError,
    },
    #[error("primary marker needs at least one colour range")]
    EmptyPrimaryRanges,
    #[error("{marker} size bounds must be positive (min={min}, max={max})")]
    NonPositiveSize { marker: MarkerKind, min: f32, max: f32 },
    #[error("{marker} min size {min} exceeds max size {max}")]
    InvertedSize { marker: MarkerKind, min: f32, max: f32 },
    #[error("{marker} min circularity must be in (0, 1], got {value}")]
    InvalidCircularity { marker: MarkerKind, value: f32 },
    #[error("aspect ratio bounds must satisfy 0 < min <= max (min={min}, max={max})")]
    InvalidAspectRatio { min: f32, max: f32 },
    #[error("dedup distance must be positive, got {0}")]
    InvalidDedupDistance(f32),
    #[error("smoothing factor must be in (0, 1], got {0}")]
    InvalidSmoothing(f32),
}
