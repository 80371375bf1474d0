use crate::state::TransformMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Window parameters for the desktop host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cubecross".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Everything tunable about the scene. Defaults reproduce the stock cube
/// cross: 80 degree field of view, pivot shift `(-4, -2, -20)`, 0.07 rad per
/// key press and five cube placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial translation of the projection; also the pivot for Alt+Left/Right.
    pub shift: Vec3,
    /// Radians per key press.
    pub rotation_rate: f32,
    pub clear_color: [f32; 4],
    /// Offsets applied to the projection before each cube draw.
    pub layout: Vec<Vec3>,
    pub mode: TransformMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            fov_degrees: 80.0,
            near: 0.1,
            far: 100.0,
            shift: Vec3::new(-4.0, -2.0, -20.0),
            rotation_rate: 0.07,
            clear_color: [0.5, 0.5, 0.5, 0.9],
            layout: vec![
                Vec3::ZERO,
                Vec3::new(-2.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(-2.0, 2.0, 0.0),
                Vec3::new(0.0, -2.0, 0.0),
            ],
            mode: TransformMode::Compounding,
        }
    }
}

impl SceneConfig {
    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            _ => serde_yaml::from_str(&text)?,
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would produce a degenerate projection or an
    /// empty frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !self.fov_degrees.is_finite() || self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return invalid(format!("fov_degrees must be in (0, 180), got {}", self.fov_degrees));
        }
        if !self.near.is_finite() || self.near <= 0.0 {
            return invalid(format!("near must be positive, got {}", self.near));
        }
        if !self.far.is_finite() || self.far <= self.near {
            return invalid(format!("far ({}) must exceed near ({})", self.far, self.near));
        }
        if !self.shift.is_finite() {
            return invalid("shift must be finite".into());
        }
        if !self.rotation_rate.is_finite() {
            return invalid("rotation_rate must be finite".into());
        }
        if self.layout.is_empty() {
            return invalid("layout must contain at least one placement".into());
        }
        if let Some(i) = self.layout.iter().position(|v| !v.is_finite()) {
            return invalid(format!("layout[{i}] is not finite"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero".into());
        }
        Ok(())
    }

    /// Sum of layout offsets; zero means a frame leaves the projection where
    /// it found it.
    pub fn layout_net_offset(&self) -> Vec3 {
        self.layout.iter().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.layout.len(), 5);
        assert_eq!(config.layout_net_offset(), Vec3::ZERO);
    }

    #[test]
    fn yaml_round_trip() {
        let config = SceneConfig {
            mode: TransformMode::Recomputed,
            rotation_rate: 0.1,
            ..SceneConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        let back: SceneConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: SceneConfig = serde_yaml::from_str("fov_degrees: 60.0\nmode: recomputed\n").unwrap();
        assert_eq!(config.fov_degrees, 60.0);
        assert_eq!(config.mode, TransformMode::Recomputed);
        assert_eq!(config.shift, Vec3::new(-4.0, -2.0, -20.0));
    }

    #[test]
    fn load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "rotation_rate: 0.2\nwindow:\n  title: test").unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.rotation_rate, 0.2);
        assert_eq!(config.window.title, "test");
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"near": 0.5, "far": 50.0}}"#).unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.near, 0.5);
        assert_eq!(config.far, 50.0);
    }

    #[test]
    fn load_rejects_invalid() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "near: 10.0\nfar: 1.0").unwrap();
        let err = SceneConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cases = [
            SceneConfig {
                fov_degrees: 0.0,
                ..SceneConfig::default()
            },
            SceneConfig {
                near: -1.0,
                ..SceneConfig::default()
            },
            SceneConfig {
                layout: Vec::new(),
                ..SceneConfig::default()
            },
            SceneConfig {
                rotation_rate: f32::NAN,
                ..SceneConfig::default()
            },
            SceneConfig {
                shift: Vec3::new(f32::INFINITY, 0.0, 0.0),
                ..SceneConfig::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be invalid");
        }
    }
}
