//! Blob extraction and shape filtering.
//!
//! Pipeline per mask:
//! 1. Label 8-connected foreground components.
//! 2. Trace the outer contour of each component (Moore neighbourhood).
//! 3. Compute area, perimeter, centroid, circularity and bounding aspect ratio.
//! 4. Drop zero-perimeter components, then filter by size, circularity and
//!    aspect ratio, in that order.

mod extract;
mod filter;
mod types;

pub use extract::{extract_blobs, label_components, trace_contour, Component};
pub use filter::{filter_blobs, find_blobs, find_blobs_with_stats, BlobFilterParams, FilterStats};
pub use types::{Blob, BoundingBox};
