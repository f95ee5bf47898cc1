use log::{debug, info, warn};
use minimap_core::{mask, BinaryMask, Channel, ColorRange, Hsv};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::CalibrationError;
use crate::percentile::ChannelPercentiles;
use crate::sample::CalibrationSample;

/// Fewer samples than this still calibrate, with a warning.
pub const RECOMMENDED_SAMPLES: usize = 5;

/// Percentile and margin settings for range derivation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    /// Lower percentile of each channel pool, in 0..=100.
    pub lower_percentile: f32,
    /// Upper percentile of each channel pool, in 0..=100.
    pub upper_percentile: f32,
    /// Margin added on each side, as a fraction of the percentile interval.
    pub margin_frac: f32,
    /// Absolute margin (h, s, v) used when a channel pool has zero spread.
    pub min_margin: [u8; 3],
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            lower_percentile: 5.0,
            upper_percentile: 95.0,
            margin_frac: 0.2,
            min_margin: [3, 10, 10],
        }
    }
}

/// Result of one calibration run.
#[derive(Clone, Debug)]
pub struct CalibrationOutcome {
    pub range: ColorRange,
    /// `range` applied to the first sample's frame.
    pub preview: BinaryMask,
    /// Number of pixels pooled across all clicks.
    pub pool_size: usize,
    /// Per-channel percentiles in (h, s, v) order, before margins.
    pub percentiles: [ChannelPercentiles; 3],
}

/// Stateless range derivation from click samples.
#[derive(Clone, Debug, Default)]
pub struct CalibrationEngine {
    params: CalibrationParams,
}

impl CalibrationEngine {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    /// Derive a colour range from `samples` and preview it on the first frame.
    ///
    /// All frames must share the first frame's size and every click must lie
    /// inside its frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, samples), fields(samples = samples.len()))
    )]
    pub fn calibrate(
        &self,
        samples: &[CalibrationSample<'_>],
    ) -> Result<CalibrationOutcome, CalibrationError> {
        let first = samples.first().ok_or(CalibrationError::NoSamples)?;
        validate_samples(samples)?;
        if samples.len() < RECOMMENDED_SAMPLES {
            warn!(
                "calibrating from {} sample(s); at least {} give a steadier range",
                samples.len(),
                RECOMMENDED_SAMPLES
            );
        }

        let mut pools: [Vec<f32>; 3] = Default::default();
        for sample in samples {
            for px in sample.neighbourhood() {
                for (pool, value) in pools.iter_mut().zip(px.channels()) {
                    pool.push(value as f32);
                }
            }
        }
        let pool_size = pools[0].len();

        let p = &self.params;
        let percentiles = pools
            .each_mut()
            .map(|pool| ChannelPercentiles::of(pool, p.lower_percentile, p.upper_percentile));

        let mut lower = [0u8; 3];
        let mut upper = [0u8; 3];
        for channel in Channel::ALL {
            let i = channel.index();
            let (lo, hi) = self.bounds(channel, &percentiles[i]);
            lower[i] = lo;
            upper[i] = hi;
        }
        let range = ColorRange::new(Hsv::from_channels(lower), Hsv::from_channels(upper));

        debug!(
            "pooled {} pixel(s) from {} click(s); percentiles h={:?} s={:?} v={:?}",
            pool_size,
            samples.len(),
            percentiles[0],
            percentiles[1],
            percentiles[2]
        );
        info!(
            "calibrated range h {}..={} s {}..={} v {}..={}",
            range.lower.h, range.upper.h, range.lower.s, range.upper.s, range.lower.v, range.upper.v
        );

        Ok(CalibrationOutcome {
            range,
            preview: mask(&first.frame, &range),
            pool_size,
            percentiles,
        })
    }

    /// Expanded and clipped integer bounds for one channel.
    fn bounds(&self, channel: Channel, p: &ChannelPercentiles) -> (u8, u8) {
        let width = p.width();
        let margin = if width > 0.0 {
            self.params.margin_frac * width
        } else {
            self.params.min_margin[channel.index()] as f32
        };
        let max = channel.max() as f32;
        let lo = (p.low - margin).floor().clamp(0.0, max);
        let hi = (p.high + margin).ceil().clamp(0.0, max);
        (lo as u8, hi as u8)
    }
}

fn validate_samples(samples: &[CalibrationSample<'_>]) -> Result<(), CalibrationError> {
    let Some(first) = samples.first() else {
        return Err(CalibrationError::NoSamples);
    };
    let (expected_width, expected_height) = (first.frame.width, first.frame.height);
    for (index, s) in samples.iter().enumerate() {
        if (s.frame.width, s.frame.height) != (expected_width, expected_height) {
            return Err(CalibrationError::FrameSizeMismatch {
                index,
                expected_width,
                expected_height,
                found_width: s.frame.width,
                found_height: s.frame.height,
            });
        }
        if !s.in_bounds() {
            return Err(CalibrationError::ClickOutOfBounds {
                index,
                x: s.x,
                y: s.y,
                width: s.frame.width,
                height: s.frame.height,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimap_core::HsvImage;

    fn frames_with_hues(hues: &[u8]) -> Vec<HsvImage> {
        hues.iter()
            .map(|&h| HsvImage::filled(9, 9, Hsv::new(h, 200, 200)))
            .collect()
    }

    fn calibrate_frames(frames: &[HsvImage]) -> CalibrationOutcome {
        let samples = frames
            .iter()
            .map(|f| CalibrationSample::new(f.view(), 4, 4))
            .collect::<Vec<_>>();
        CalibrationEngine::default()
            .calibrate(&samples)
            .expect("calibration")
    }

    #[test]
    fn hue_percentiles_with_margin() {
        let frames = frames_with_hues(&[10, 12, 11, 13, 10]);
        let out = calibrate_frames(&frames);

        assert_eq!(out.pool_size, 45);
        assert_eq!(out.percentiles[0].low, 10.0);
        assert_eq!(out.percentiles[0].high, 13.0);
        // margin 0.2 * 3 = 0.6, rounded outward
        assert_eq!(out.range.lower.h, 9);
        assert_eq!(out.range.upper.h, 14);

        // [11 - 0.6, 11 + 0.6] is inside, far values are not.
        for h in 10..=12 {
            assert!(out.range.contains(Hsv::new(h, 200, 200)));
        }
        assert!(!out.range.contains(Hsv::new(6, 200, 200)));
        assert!(!out.range.contains(Hsv::new(17, 200, 200)));
    }

    #[test]
    fn constant_channels_use_minimum_margin() {
        let frames = frames_with_hues(&[10, 12, 11, 13, 10]);
        let out = calibrate_frames(&frames);
        assert_eq!(out.percentiles[1].width(), 0.0);
        assert_eq!((out.range.lower.s, out.range.upper.s), (190, 210));
        assert_eq!((out.range.lower.v, out.range.upper.v), (190, 210));
    }

    #[test]
    fn range_is_clipped_to_channel_domains() {
        let frames = [
            HsvImage::filled(5, 5, Hsv::new(0, 250, 255)),
            HsvImage::filled(5, 5, Hsv::new(1, 252, 255)),
            HsvImage::filled(5, 5, Hsv::new(2, 255, 255)),
        ];
        let samples = frames
            .iter()
            .map(|f| CalibrationSample::new(f.view(), 2, 2))
            .collect::<Vec<_>>();
        let out = CalibrationEngine::default()
            .calibrate(&samples)
            .expect("calibration");
        assert_eq!(out.range.lower.h, 0);
        assert_eq!(out.range.upper.v, 255);
        assert_eq!(out.range.upper.s, 255);
        assert!(out.range.validate().is_ok());

        let top = [HsvImage::filled(5, 5, Hsv::new(179, 255, 255))];
        let samples = [CalibrationSample::new(top[0].view(), 2, 2)];
        let out = CalibrationEngine::default()
            .calibrate(&samples)
            .expect("calibration");
        assert_eq!(out.range.upper.h, 179);
        assert_eq!(out.range.lower.h, 176);
    }

    #[test]
    fn single_sample_succeeds() {
        let frames = frames_with_hues(&[30]);
        let out = calibrate_frames(&frames);
        assert_eq!(out.pool_size, 9);
        assert_eq!((out.range.lower.h, out.range.upper.h), (27, 33));
    }

    #[test]
    fn no_samples_is_an_error() {
        let err = CalibrationEngine::default().calibrate(&[]).unwrap_err();
        assert_eq!(err, CalibrationError::NoSamples);
    }

    #[test]
    fn click_outside_frame_is_an_error() {
        let img = HsvImage::filled(6, 4, Hsv::new(10, 10, 10));
        let samples = [
            CalibrationSample::new(img.view(), 1, 1),
            CalibrationSample::new(img.view(), 6, 1),
        ];
        let err = CalibrationEngine::default()
            .calibrate(&samples)
            .unwrap_err();
        assert_eq!(
            err,
            CalibrationError::ClickOutOfBounds {
                index: 1,
                x: 6,
                y: 1,
                width: 6,
                height: 4
            }
        );
    }

    #[test]
    fn mismatched_frames_are_an_error() {
        let a = HsvImage::filled(6, 4, Hsv::new(10, 10, 10));
        let b = HsvImage::filled(5, 4, Hsv::new(10, 10, 10));
        let samples = [
            CalibrationSample::new(a.view(), 1, 1),
            CalibrationSample::new(b.view(), 1, 1),
        ];
        assert!(matches!(
            CalibrationEngine::default().calibrate(&samples),
            Err(CalibrationError::FrameSizeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn preview_masks_the_first_frame() {
        let background = Hsv::new(100, 30, 40);
        let marker = Hsv::new(28, 220, 230);
        let mut first = HsvImage::filled(40, 20, background);
        first.fill_disk(10, 10, 3, marker);
        let mut second = HsvImage::filled(40, 20, background);
        second.fill_disk(30, 5, 3, marker);

        let samples = [
            CalibrationSample::new(first.view(), 10, 10),
            CalibrationSample::new(second.view(), 30, 5),
        ];
        let out = CalibrationEngine::default()
            .calibrate(&samples)
            .expect("calibration");
        assert_eq!(out.preview.width, 40);
        assert!(out.preview.get(10, 10));
        assert!(!out.preview.get(30, 5));
        assert!(!out.preview.get(0, 0));
    }

    #[test]
    fn params_round_trip_through_partial_json() {
        let params: CalibrationParams =
            serde_json::from_str(r#"{"margin_frac":0.5}"#).expect("parse");
        assert_eq!(params.margin_frac, 0.5);
        assert_eq!(params.min_margin, [3, 10, 10]);
        assert_eq!(params.lower_percentile, 5.0);
    }
}
