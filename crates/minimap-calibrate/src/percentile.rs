use serde::{Deserialize, Serialize};

/// Percentile `q` (0..=100) of an ascending slice, interpolating linearly
/// between the two closest ranks. Returns `0.0` for an empty slice.
pub fn percentile(sorted: &[f32], q: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (sorted.len() - 1) as f32 * (q / 100.0).clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let t = rank - lo as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * t
}

/// Lower/upper percentile of one channel's sample pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPercentiles {
    pub low: f32,
    pub high: f32,
}

impl ChannelPercentiles {
    pub(crate) fn of(values: &mut [f32], low_q: f32, high_q: f32) -> Self {
        values.sort_by(f32::total_cmp);
        Self {
            low: percentile(values, low_q),
            high: percentile(values, high_q),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.high - self.low
    }
}
