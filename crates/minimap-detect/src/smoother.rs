use nalgebra::Point2;

/// Exponential moving average over primary-marker positions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TemporalSmoother {
    state: Option<Point2<f32>>,
}

impl TemporalSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a raw position into the state and return the smoothed position.
    ///
    /// The first sample after construction or [`reset`](Self::reset) is
    /// taken as-is.
    pub fn update(&mut self, raw: Point2<f32>, alpha: f32) -> Point2<f32> {
        let next = match self.state {
            Some(prev) => Point2::from(raw.coords * alpha + prev.coords * (1.0 - alpha)),
            None => raw,
        };
        self.state = Some(next);
        next
    }

    #[inline]
    pub fn state(&self) -> Option<Point2<f32>> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn first_sample_is_taken_verbatim() {
        let mut s = TemporalSmoother::new();
        assert_eq!(s.state(), None);
        let p = s.update(Point2::new(7.0, -2.0), 0.3);
        assert_eq!(p, Point2::new(7.0, -2.0));
    }

    #[test]
    fn second_sample_is_weighted_by_alpha() {
        let mut s = TemporalSmoother::new();
        s.update(Point2::new(0.0, 0.0), 0.3);
        let p = s.update(Point2::new(10.0, 10.0), 0.3);
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 0.5);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 0.5);
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn repeated_input_converges_monotonically() {
        let mut s = TemporalSmoother::new();
        s.update(Point2::new(0.0, 0.0), 0.3);
        let target = Point2::new(10.0, 10.0);
        let mut last_gap = f32::INFINITY;
        for _ in 0..40 {
            let p = s.update(target, 0.3);
            let gap = (target - p).norm();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 0.01);
    }

    #[test]
    fn alpha_one_tracks_raw_input() {
        let mut s = TemporalSmoother::new();
        s.update(Point2::new(1.0, 1.0), 1.0);
        assert_eq!(s.update(Point2::new(5.0, 6.0), 1.0), Point2::new(5.0, 6.0));
    }

    #[test]
    fn reset_clears_history() {
        let mut s = TemporalSmoother::new();
        s.update(Point2::new(1.0, 1.0), 0.5);
        s.reset();
        assert_eq!(s.update(Point2::new(9.0, 9.0), 0.5), Point2::new(9.0, 9.0));
    }
}
