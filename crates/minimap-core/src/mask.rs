use crate::hsv::HsvImageView;
use crate::range::ColorRange;

/// Row-major binary image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<bool>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Out-of-bounds reads are background.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.data[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Logical OR with a mask of the same size. Mismatched sizes are ignored.
    pub fn union_in_place(&mut self, other: &BinaryMask) {
        if other.width != self.width || other.height != self.height {
            return;
        }
        for (dst, &src) in self.data.iter_mut().zip(&other.data) {
            *dst |= src;
        }
    }

    /// 0/255 bytes, suitable for writing out as an 8-bit preview image.
    pub fn to_luma_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|&v| if v { 255 } else { 0 }).collect()
    }
}

/// Threshold `frame` against a single non-wrapping range.
pub fn mask(frame: &HsvImageView<'_>, range: &ColorRange) -> BinaryMask {
    if frame.is_empty() {
        return BinaryMask::new(frame.width, frame.height);
    }
    let n = frame.width * frame.height;
    BinaryMask {
        width: frame.width,
        height: frame.height,
        data: frame.data[..n].iter().map(|&px| range.contains(px)).collect(),
    }
}

/// Union of the masks for every range in `ranges`.
pub fn mask_any(frame: &HsvImageView<'_>, ranges: &[ColorRange]) -> BinaryMask {
    let mut out = BinaryMask::new(frame.width, frame.height);
    if frame.is_empty() {
        return out;
    }
    let n = frame.width * frame.height;
    for (dst, &px) in out.data.iter_mut().zip(&frame.data[..n]) {
        *dst = ranges.iter().any(|r| r.contains(px));
    }
    out
}
