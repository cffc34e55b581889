use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::transition::FramingOptions;

/// Settings for the reference animated camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view used to fit a sphere on screen.
    pub fov_y_deg: f64,
    /// Closest the camera may settle to a sphere's center.
    pub min_range_m: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            min_range_m: 100.0,
        }
    }
}

/// Top-level framing configuration, loadable from JSON.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub transition: FramingOptions,
    pub camera: CameraConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(msg) => write!(f, "invalid framing config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FramingConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraConfig, ConfigError, FramingConfig};
    use crate::transition::FramingOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_uses_defaults() {
        let config = FramingConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FramingConfig::default());
        assert_eq!(config.transition, FramingOptions::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = FramingConfig::from_json_str(
            r#"{"transition": {"pitch_deg": -45.0, "duration_s": 3.0}, "camera": {"fov_y_deg": 45.0}}"#,
        )
        .unwrap();
        assert_eq!(config.transition.pitch_deg, -45.0);
        assert_eq!(config.transition.duration_s, 3.0);
        assert_eq!(config.transition.heading_deg, 0.0);
        assert_eq!(config.transition.scale, 2.0);
        assert_eq!(config.camera.fov_y_deg, 45.0);
        assert_eq!(config.camera.min_range_m, 100.0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = FramingConfig::from_json_str("{\"transition\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FramingConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("not/here.json"));
    }
}
