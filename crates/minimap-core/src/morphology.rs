//! 3×3 binary morphology.
//!
//! Pixels outside the mask do not participate: erosion only looks at
//! in-bounds neighbours, so foreground touching the frame edge is not eaten
//! away by the border.

use crate::mask::BinaryMask;

fn neighbourhood(src: &BinaryMask, keep_if_all: bool) -> BinaryMask {
    let mut out = BinaryMask::new(src.width, src.height);
    let (w, h) = (src.width as i64, src.height as i64);
    for y in 0..h {
        for x in 0..w {
            let mut all = true;
            let mut any = false;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let v = src.get(nx, ny);
                    all &= v;
                    any |= v;
                }
            }
            let value = if keep_if_all { all } else { any };
            out.set(x as usize, y as usize, value);
        }
    }
    out
}

pub fn erode(src: &BinaryMask) -> BinaryMask {
    neighbourhood(src, true)
}

pub fn dilate(src: &BinaryMask) -> BinaryMask {
    neighbourhood(src, false)
}

/// Erode then dilate: removes isolated foreground specks.
pub fn open(src: &BinaryMask) -> BinaryMask {
    dilate(&erode(src))
}

/// Dilate then erode: fills pinholes and one-pixel gaps.
pub fn close(src: &BinaryMask) -> BinaryMask {
    erode(&dilate(src))
}

/// Opening followed by closing.
pub fn clean(src: &BinaryMask) -> BinaryMask {
    close(&open(src))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> BinaryMask {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut m = BinaryMask::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                m.set(x, y, c == '#');
            }
        }
        m
    }

    #[test]
    fn opening_removes_single_pixel_speckle() {
        let m = mask_from_rows(&[
            ".......", //
            ".#.....", //
            ".......", //
            "...###.", //
            "...###.", //
            "...###.", //
        ]);
        let opened = open(&m);
        assert!(!opened.get(1, 1));
        assert_eq!(opened.count(), 9);
    }

    #[test]
    fn closing_fills_interior_hole() {
        let m = mask_from_rows(&[
            ".......", //
            ".......", //
            "..###..", //
            "..#.#..", //
            "..###..", //
            ".......", //
            ".......", //
        ]);
        let closed = close(&m);
        assert!(closed.get(3, 3));
        assert_eq!(closed.count(), 9);
    }

    #[test]
    fn clean_keeps_solid_blob_centred() {
        let mut m = BinaryMask::new(11, 11);
        for y in 3..8 {
            for x in 3..8 {
                m.set(x, y, true);
            }
        }
        let cleaned = clean(&m);
        assert_eq!(cleaned, m);
    }

    #[test]
    fn empty_mask_is_a_fixed_point() {
        let m = BinaryMask::new(0, 0);
        assert_eq!(clean(&m), m);
    }
}
