use std::sync::{Arc, PoisonError, RwLock};

use minimap_core::ColorRange;

use crate::error::ConfigError;
use crate::params::DetectorConfig;

/// Live configuration that detection reads and calibration commits to.
///
/// Readers clone the inner `Arc` under a short read lock, so one detection
/// call always sees a single consistent snapshot. Commits validate first and
/// swap the whole snapshot under the write lock.
#[derive(Clone, Debug)]
pub struct SharedDetectorConfig {
    inner: Arc<RwLock<Arc<DetectorConfig>>>,
}

impl SharedDetectorConfig {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    pub fn snapshot(&self) -> Arc<DetectorConfig> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the whole configuration.
    pub fn commit(&self, config: DetectorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(config);
        Ok(())
    }

    /// Replace only the primary colour ranges, e.g. after calibration.
    pub fn commit_primary_ranges(&self, ranges: Vec<ColorRange>) -> Result<(), ConfigError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = DetectorConfig::clone(&guard);
        next.primary.ranges = ranges;
        next.validate()?;
        *guard = Arc::new(next);
        log::info!("committed {} primary colour range(s)", guard.primary.ranges.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimap_core::Hsv;

    #[test]
    fn snapshots_are_isolated_from_later_commits() {
        let shared = SharedDetectorConfig::new(DetectorConfig::default()).expect("valid");
        let before = shared.snapshot();

        let range = ColorRange::new(Hsv::new(40, 50, 50), Hsv::new(60, 255, 255));
        shared.commit_primary_ranges(vec![range]).expect("commit");

        assert_ne!(before.primary.ranges, vec![range]);
        assert_eq!(shared.snapshot().primary.ranges, vec![range]);
    }

    #[test]
    fn invalid_commit_keeps_previous_config() {
        let shared = SharedDetectorConfig::new(DetectorConfig::default()).expect("valid");
        let err = shared.commit_primary_ranges(Vec::new());
        assert_eq!(err, Err(ConfigError::EmptyPrimaryRanges));
        assert_eq!(*shared.snapshot(), DetectorConfig::default());
    }

    #[test]
    fn clones_share_the_same_slot() {
        let a = SharedDetectorConfig::new(DetectorConfig::default()).expect("valid");
        let b = a.clone();
        let mut cfg = DetectorConfig::default();
        cfg.smoothing_alpha = 0.9;
        b.commit(cfg).expect("commit");
        assert_eq!(a.snapshot().smoothing_alpha, 0.9);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let shared = SharedDetectorConfig::new(DetectorConfig::default()).expect("valid");
        let writer = shared.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..50u8 {
                let range = ColorRange::new(Hsv::new(i, 0, 0), Hsv::new(i + 10, 255, 255));
                writer.commit_primary_ranges(vec![range]).expect("commit");
            }
        });
        for _ in 0..200 {
            let snap = shared.snapshot();
            assert!(snap.validate().is_ok());
        }
        handle.join().expect("writer thread");
    }
}
