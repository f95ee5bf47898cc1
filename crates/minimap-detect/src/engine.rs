use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use minimap_blobs::{find_blobs_with_stats, Blob, BlobFilterParams, FilterStats};
use minimap_core::{clean, mask_any, BinaryMask, ColorRange, HsvImageView};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::ConfigError;
use crate::params::{DetectorConfig, MarkerKind};
use crate::result::{DetectionDebug, DetectionResult, PrimaryMarker, SecondaryMarkers};
use crate::select::{dedup_secondary, select_primary};
use crate::shared::SharedDetectorConfig;
use crate::smoother::TemporalSmoother;

#[derive(Clone, Debug)]
enum ConfigSource {
    Unconfigured,
    Owned(Arc<DetectorConfig>),
    Shared(SharedDetectorConfig),
}

/// Per-frame minimap detector.
///
/// Owns the smoothing state. Calls take `&mut self`, so one engine cannot be
/// driven from two threads at once without an explicit lock.
#[derive(Clone, Debug)]
pub struct DetectionEngine {
    source: ConfigSource,
    smoother: TemporalSmoother,
}

struct MarkerPass {
    mask: BinaryMask,
    blobs: Vec<Blob>,
    stats: FilterStats,
}

fn run_marker_pass(
    frame: &HsvImageView<'_>,
    ranges: &[ColorRange],
    params: &BlobFilterParams,
) -> MarkerPass {
    if ranges.is_empty() {
        return MarkerPass {
            mask: BinaryMask::new(frame.width, frame.height),
            blobs: Vec::new(),
            stats: FilterStats::default(),
        };
    }
    let mask = clean(&mask_any(frame, ranges));
    let (blobs, stats) = find_blobs_with_stats(&mask, params);
    MarkerPass { mask, blobs, stats }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl DetectionEngine {
    /// Engine with its own validated configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source: ConfigSource::Owned(Arc::new(config)),
            smoother: TemporalSmoother::new(),
        })
    }

    /// Engine without configuration: every call reports nothing detected.
    pub fn unconfigured() -> Self {
        Self {
            source: ConfigSource::Unconfigured,
            smoother: TemporalSmoother::new(),
        }
    }

    /// Engine reading a live configuration that may be re-committed between calls.
    pub fn with_shared(shared: SharedDetectorConfig) -> Self {
        Self {
            source: ConfigSource::Shared(shared),
            smoother: TemporalSmoother::new(),
        }
    }

    /// Current configuration snapshot, if any.
    pub fn config(&self) -> Option<Arc<DetectorConfig>> {
        match &self.source {
            ConfigSource::Unconfigured => None,
            ConfigSource::Owned(cfg) => Some(Arc::clone(cfg)),
            ConfigSource::Shared(shared) => Some(shared.snapshot()),
        }
    }

    /// Replace the configuration and forget the smoothed position.
    pub fn set_config(&mut self, config: DetectorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.source = ConfigSource::Owned(Arc::new(config));
        self.smoother.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    /// Last smoothed primary position, kept across calls without a detection.
    #[inline]
    pub fn smoothed_position(&self) -> Option<Point2<f32>> {
        self.smoother.state()
    }

    /// Detect markers, stamping the result with the current time.
    pub fn detect(&mut self, frame: &HsvImageView<'_>) -> DetectionResult {
        self.detect_at(frame, now_ms())
    }

    /// Detect markers with an explicit timestamp.
    pub fn detect_at(&mut self, frame: &HsvImageView<'_>, timestamp_ms: u64) -> DetectionResult {
        self.run(frame, timestamp_ms, false).0
    }

    /// Detect markers and keep every intermediate product.
    pub fn detect_with_debug(
        &mut self,
        frame: &HsvImageView<'_>,
        timestamp_ms: u64,
    ) -> (DetectionResult, DetectionDebug) {
        let (result, debug) = self.run(frame, timestamp_ms, true);
        (result, debug.unwrap_or_default())
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, frame),
            fields(width = frame.width, height = frame.height)
        )
    )]
    fn run(
        &mut self,
        frame: &HsvImageView<'_>,
        timestamp_ms: u64,
        keep_debug: bool,
    ) -> (DetectionResult, Option<DetectionDebug>) {
        let Some(config) = self.config() else {
            debug!("no detector configuration; reporting nothing");
            return (DetectionResult::empty(timestamp_ms), None);
        };
        if frame.is_empty() {
            debug!(
                "empty frame region {}x{} ({} pixels)",
                frame.width,
                frame.height,
                frame.data.len()
            );
            return (DetectionResult::empty(timestamp_ms), None);
        }

        let primary_pass = run_marker_pass(
            frame,
            &config.primary.ranges,
            &config.filter_params(MarkerKind::Primary),
        );
        let (cx, cy) = frame.center();
        let selected = select_primary(&primary_pass.blobs, Point2::new(cx, cy)).copied();

        let primary = match selected {
            Some(blob) => {
                let smoothed = self.smoother.update(blob.centroid, config.smoothing_alpha);
                PrimaryMarker::found(smoothed, blob.circularity)
            }
            None => PrimaryMarker::not_detected(),
        };

        let secondary_pass = run_marker_pass(
            frame,
            &config.secondary.ranges,
            &config.filter_params(MarkerKind::Secondary),
        );
        let secondary = SecondaryMarkers::from_positions(dedup_secondary(
            &secondary_pass.blobs,
            config.dedup_distance,
        ));

        debug!(
            "primary: {} candidate(s), detected={}; secondary: {} candidate(s), {} marker(s)",
            primary_pass.blobs.len(),
            primary.detected,
            secondary_pass.blobs.len(),
            secondary.count
        );

        let result = DetectionResult {
            primary,
            secondary,
            timestamp_ms,
        };
        let debug = keep_debug.then(|| DetectionDebug {
            primary_mask: primary_pass.mask,
            secondary_mask: secondary_pass.mask,
            primary_blobs: primary_pass.blobs,
            secondary_blobs: secondary_pass.blobs,
            primary_stats: primary_pass.stats,
            secondary_stats: secondary_pass.stats,
            raw_primary: selected.map(|b| b.centroid),
        });
        (result, debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use minimap_core::{Hsv, HsvImage};

    const BACKGROUND: Hsv = Hsv::new(90, 40, 60);
    const YELLOW: Hsv = Hsv::new(28, 220, 230);

    fn frame_with_primary(x: i64, y: i64) -> HsvImage {
        let mut img = HsvImage::filled(340, 86, BACKGROUND);
        img.fill_disk(x, y, 3, YELLOW);
        img
    }

    #[test]
    fn unconfigured_engine_reports_nothing() {
        let mut engine = DetectionEngine::unconfigured();
        let img = frame_with_primary(170, 43);
        let r = engine.detect_at(&img.view(), 42);
        assert!(!r.primary.detected);
        assert!(!r.secondary.detected);
        assert_eq!(r.secondary.count, 0);
        assert_eq!(r.timestamp_ms, 42);
    }

    #[test]
    fn empty_frame_yields_empty_result() {
        let mut engine = DetectionEngine::new(DetectorConfig::default()).expect("config");
        let img = HsvImage::filled(0, 0, BACKGROUND);
        let r = engine.detect_at(&img.view(), 7);
        assert_eq!(r, DetectionResult::empty(7));
    }

    #[test]
    fn lost_marker_keeps_smoothed_state() {
        let mut engine = DetectionEngine::new(DetectorConfig::default()).expect("config");
        let first = engine.detect_at(&frame_with_primary(100, 40).view(), 0);
        assert!(first.primary.detected);

        let blank = HsvImage::filled(340, 86, BACKGROUND);
        let lost = engine.detect_at(&blank.view(), 1);
        assert!(!lost.primary.detected);
        assert!(lost.player_position().is_none());
        let kept = engine.smoothed_position().expect("state retained");
        assert_abs_diff_eq!(kept.x, 100.0, epsilon = 1e-4);

        // Re-acquisition blends with the retained state.
        let again = engine.detect_at(&frame_with_primary(110, 40).view(), 2);
        let p = again.player_position().expect("detected");
        assert_abs_diff_eq!(p.x, 103.0, epsilon = 1e-3);
    }

    #[test]
    fn set_config_resets_smoother() {
        let mut engine = DetectionEngine::new(DetectorConfig::default()).expect("config");
        engine.detect_at(&frame_with_primary(100, 40).view(), 0);
        assert!(engine.smoothed_position().is_some());
        engine.set_config(DetectorConfig::default()).expect("config");
        assert!(engine.smoothed_position().is_none());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut cfg = DetectorConfig::default();
        cfg.smoothing_alpha = 1.5;
        assert!(DetectionEngine::new(cfg).is_err());
    }

    #[test]
    fn debug_output_exposes_raw_position_and_masks() {
        let mut engine = DetectionEngine::new(DetectorConfig::default()).expect("config");
        let img = frame_with_primary(170, 43);
        let (r, dbg) = engine.detect_with_debug(&img.view(), 0);
        assert!(r.primary.detected);
        assert_eq!(dbg.primary_blobs.len(), 1);
        assert_eq!(dbg.primary_stats.accepted, 1);
        assert_eq!(dbg.primary_mask.width, 340);
        assert_eq!(dbg.secondary_mask.count(), 0);
        let raw = dbg.raw_primary.expect("raw centroid");
        assert_abs_diff_eq!(raw.x, 170.0, epsilon = 1.0);
        assert_abs_diff_eq!(raw.y, 43.0, epsilon = 1.0);
    }

    #[test]
    fn shared_config_commit_is_seen_on_next_call() {
        let shared = SharedDetectorConfig::new(DetectorConfig::default()).expect("config");
        let mut engine = DetectionEngine::with_shared(shared.clone());

        let mut img = HsvImage::filled(340, 86, BACKGROUND);
        img.fill_disk(170, 43, 3, Hsv::new(60, 220, 230));
        assert!(!engine.detect_at(&img.view(), 0).primary.detected);

        let green = ColorRange::new(Hsv::new(55, 150, 150), Hsv::new(65, 255, 255));
        shared.commit_primary_ranges(vec![green]).expect("commit");
        assert!(engine.detect_at(&img.view(), 1).primary.detected);
    }
}
