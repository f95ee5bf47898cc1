use log::trace;
use minimap_core::BinaryMask;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::extract::extract_counted;
use crate::types::Blob;

/// Acceptance bounds for one marker type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobFilterParams {
    /// Minimum blob diameter in pixels.
    pub min_size: f32,
    /// Maximum blob diameter in pixels.
    pub max_size: f32,
    pub min_circularity: f32,
    pub min_aspect_ratio: f32,
    pub max_aspect_ratio: f32,
}

impl Default for BlobFilterParams {
    fn default() -> Self {
        Self {
            min_size: 3.0,
            max_size: 15.0,
            min_circularity: 0.6,
            min_aspect_ratio: 0.5,
            max_aspect_ratio: 2.0,
        }
    }
}

impl BlobFilterParams {
    #[inline]
    fn size_ok(&self, blob: &Blob) -> bool {
        let r = blob.effective_radius();
        r >= self.min_size * 0.5 && r <= self.max_size * 0.5
    }

    #[inline]
    fn circularity_ok(&self, blob: &Blob) -> bool {
        blob.circularity >= self.min_circularity
    }

    #[inline]
    fn aspect_ok(&self, blob: &Blob) -> bool {
        blob.aspect_ratio >= self.min_aspect_ratio && blob.aspect_ratio <= self.max_aspect_ratio
    }
}

/// Per-stage rejection counters for one mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub components: usize,
    pub zero_perimeter: usize,
    pub rejected_size: usize,
    pub rejected_circularity: usize,
    pub rejected_aspect: usize,
    pub accepted: usize,
}

/// Apply size, circularity and aspect-ratio bounds in that order.
pub fn filter_blobs(blobs: Vec<Blob>, params: &BlobFilterParams) -> Vec<Blob> {
    let mut stats = FilterStats::default();
    filter_with_stats(blobs, params, &mut stats)
}

fn filter_with_stats(
    blobs: Vec<Blob>,
    params: &BlobFilterParams,
    stats: &mut FilterStats,
) -> Vec<Blob> {
    let mut out = Vec::with_capacity(blobs.len());
    for blob in blobs {
        if !params.size_ok(&blob) {
            stats.rejected_size += 1;
            continue;
        }
        if !params.circularity_ok(&blob) {
            stats.rejected_circularity += 1;
            continue;
        }
        if !params.aspect_ok(&blob) {
            stats.rejected_aspect += 1;
            continue;
        }
        out.push(blob);
    }
    stats.accepted += out.len();
    out
}

/// Extract and filter blobs from `mask`.
pub fn find_blobs(mask: &BinaryMask, params: &BlobFilterParams) -> Vec<Blob> {
    find_blobs_with_stats(mask, params).0
}

/// Same as [`find_blobs`], also reporting where candidates were rejected.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(mask, params),
        fields(width = mask.width, height = mask.height)
    )
)]
pub fn find_blobs_with_stats(
    mask: &BinaryMask,
    params: &BlobFilterParams,
) -> (Vec<Blob>, FilterStats) {
    let (raw, components) = extract_counted(mask);
    let mut stats = FilterStats {
        components,
        zero_perimeter: components - raw.len(),
        ..FilterStats::default()
    };
    let blobs = filter_with_stats(raw, params, &mut stats);
    trace!(
        "blobs: {} components, {} degenerate, {} size, {} circularity, {} aspect, {} accepted",
        stats.components,
        stats.zero_perimeter,
        stats.rejected_size,
        stats.rejected_circularity,
        stats.rejected_aspect,
        stats.accepted
    );
    (blobs, stats)
}
