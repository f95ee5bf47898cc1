use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Inclusive pixel bounds of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    #[inline]
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// Geometric description of one connected foreground region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Polygon area enclosed by the traced contour (px²).
    pub area: f32,
    /// Number of foreground pixels in the component.
    pub pixel_count: usize,
    /// Contour length (px), diagonal steps count √2.
    pub perimeter: f32,
    /// First-moment centroid in region-local pixel coordinates.
    pub centroid: Point2<f32>,
    /// `4π·area / perimeter²`; 1.0 is a perfect circle.
    pub circularity: f32,
    /// Bounding width / height.
    pub aspect_ratio: f32,
    pub bbox: BoundingBox,
}

impl Blob {
    /// Radius of the circle with the same area.
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        (self.area / std::f32::consts::PI).sqrt()
    }

    #[inline]
    pub fn distance_sq_to(&self, p: Point2<f32>) -> f32 {
        (self.centroid - p).norm_squared()
    }
}
