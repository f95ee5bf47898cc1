use std::fs;
use std::path::Path;

use minimap_detect::{ConfigError, DetectionEngine, DetectorConfig};
use minimap_waypoint::{DeparturePoint, DeparturePointError};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Errors from loading or saving a [`MinimapConfig`].
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid detector config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid departure point: {0}")]
    DeparturePoint(#[from] DeparturePointError),
}

/// Persisted configuration: detector settings plus stored waypoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub detector: DetectorConfig,
    pub departure_points: Vec<DeparturePoint>,
}

impl MinimapConfig {
    pub fn validate(&self) -> Result<(), IoError> {
        self.detector.validate()?;
        for point in &self.departure_points {
            point.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, IoError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::debug!(
            "loaded {} with {} departure point(s)",
            path.display(),
            config.departure_points.len()
        );
        Ok(config)
    }

    /// Validate and write as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// A fresh engine with its own smoother for this config.
    pub fn build_engine(&self) -> Result<DetectionEngine, ConfigError> {
        DetectionEngine::new(self.detector.clone())
    }

    /// Stored departure points reached by `player`.
    pub fn hits(&self, player: Option<Point2<f32>>) -> impl Iterator<Item = &DeparturePoint> {
        minimap_waypoint::hits(player, &self.departure_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimap_waypoint::ToleranceMode;

    #[test]
    fn empty_document_is_the_default_config() {
        let cfg = MinimapConfig::from_json_str("{}").expect("parse");
        assert_eq!(cfg, MinimapConfig::default());
    }

    #[test]
    fn invalid_detector_section_fails_at_load() {
        let err = MinimapConfig::from_json_str(r#"{"detector":{"smoothing_alpha":2.0}}"#)
            .expect_err("must fail");
        assert!(matches!(
            err,
            IoError::Config(ConfigError::InvalidSmoothing(_))
        ));
    }

    #[test]
    fn invalid_departure_point_fails_at_load() {
        let json = r#"{"departure_points":[
            {"name":"gate","x":1,"y":2,"tolerance_mode":"both","tolerance_value":-3}
        ]}"#;
        let err = MinimapConfig::from_json_str(json).expect_err("must fail");
        assert!(matches!(err, IoError::DeparturePoint(_)));
    }

    #[test]
    fn hits_use_stored_points() {
        let cfg = MinimapConfig {
            departure_points: vec![
                DeparturePoint::new("a", 10.0, 10.0, ToleranceMode::Both, 2.0),
                DeparturePoint::new("b", 10.0, 10.0, ToleranceMode::YGreater, 0.0),
            ],
            ..MinimapConfig::default()
        };
        let names = cfg
            .hits(Some(Point2::new(11.0, 11.0)))
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(cfg.hits(None).count(), 0);
    }
}
