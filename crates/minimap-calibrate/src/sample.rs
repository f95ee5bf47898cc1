use minimap_core::{Hsv, HsvImageView};

/// One operator click on a minimap frame.
#[derive(Clone, Copy, Debug)]
pub struct CalibrationSample<'a> {
    pub frame: HsvImageView<'a>,
    pub x: usize,
    pub y: usize,
}

impl<'a> CalibrationSample<'a> {
    pub fn new(frame: HsvImageView<'a>, x: usize, y: usize) -> Self {
        Self { frame, x, y }
    }

    #[inline]
    pub fn in_bounds(&self) -> bool {
        self.x < self.frame.width && self.y < self.frame.height
    }

    /// The clicked pixel and its 3×3 neighbours that lie inside the frame.
    pub fn neighbourhood(&self) -> impl Iterator<Item = Hsv> + 'a {
        let (frame, x, y) = (self.frame, self.x as i64, self.y as i64);
        (-1i64..=1)
            .flat_map(move |dy| (-1i64..=1).map(move |dx| (x + dx, y + dy)))
            .filter_map(move |(px, py)| {
                if px < 0 || py < 0 {
                    return None;
                }
                frame.get(px as usize, py as usize)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimap_core::HsvImage;

    #[test]
    fn interior_click_reads_nine_pixels() {
        let img = HsvImage::filled(8, 8, Hsv::new(1, 2, 3));
        let s = CalibrationSample::new(img.view(), 4, 4);
        assert_eq!(s.neighbourhood().count(), 9);
    }

    #[test]
    fn border_clicks_are_clipped() {
        let img = HsvImage::filled(8, 6, Hsv::new(1, 2, 3));
        assert_eq!(CalibrationSample::new(img.view(), 0, 0).neighbourhood().count(), 4);
        assert_eq!(CalibrationSample::new(img.view(), 7, 3).neighbourhood().count(), 6);
        assert_eq!(CalibrationSample::new(img.view(), 7, 5).neighbourhood().count(), 4);
    }

    #[test]
    fn reads_actual_neighbour_values() {
        let mut img = HsvImage::filled(5, 5, Hsv::new(0, 0, 0));
        img.set(3, 2, Hsv::new(50, 60, 70));
        let s = CalibrationSample::new(img.view(), 2, 2);
        assert!(s.neighbourhood().any(|p| p == Hsv::new(50, 60, 70)));
        assert!(!CalibrationSample::new(img.view(), 0, 0)
            .neighbourhood()
            .any(|p| p == Hsv::new(50, 60, 70)));
    }
}
