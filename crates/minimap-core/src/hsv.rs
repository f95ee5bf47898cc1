use serde::{Deserialize, Serialize};

/// Largest hue value (8-bit convention: degrees / 2).
pub const HUE_MAX: u8 = 179;
pub const SAT_MAX: u8 = 255;
pub const VAL_MAX: u8 = 255;

/// One pixel in 8-bit hue/saturation/value space.
///
/// Hue is stored in half-degrees, `[0, 179]`; saturation and value span
/// `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }

    #[inline]
    pub fn from_channels([h, s, v]: [u8; 3]) -> Self {
        Self { h, s, v }
    }
}

/// Convert one sRGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    if delta == 0.0 {
        return Hsv { h: 0, s, v };
    }

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let mut deg = if max == r {
        60.0 * (gf - bf) / delta
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if deg < 0.0 {
        deg += 360.0;
    }

    // 359.x degrees rounds up to 180, which is the same hue as 0.
    let h = ((deg / 2.0).round() as u16 % 180) as u8;
    Hsv { h, s, v }
}

/// Borrowed, row-major HSV image. `data.len() == width * height`.
#[derive(Clone, Copy, Debug)]
pub struct HsvImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [Hsv],
}

impl<'a> HsvImageView<'a> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.len() < self.width * self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Hsv> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Geometric centre of the region in pixel coordinates.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.width as f32 - 1.0) * 0.5,
            (self.height as f32 - 1.0) * 0.5,
        )
    }
}

/// Owned HSV image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Hsv>,
}

impl HsvImage {
    /// Image filled with a single colour.
    pub fn filled(width: usize, height: usize, color: Hsv) -> Self {
        Self {
            width,
            height,
            data: vec![color; width * height],
        }
    }

    /// Convert an interleaved RGB buffer (`len = 3 * width * height`).
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(3)?;
        if rgb.len() != expected {
            return None;
        }
        let data = rgb
            .chunks_exact(3)
            .map(|px| rgb_to_hsv(px[0], px[1], px[2]))
            .collect();
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> HsvImageView<'_> {
        HsvImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Hsv) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = color;
        }
    }

    /// Paint a filled disk of integer radius centred on `(cx, cy)`.
    pub fn fill_disk(&mut self, cx: i64, cy: i64, radius: i64, color: Hsv) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 {
                    self.set(x as usize, y as usize, color);
                }
            }
        }
    }
}
