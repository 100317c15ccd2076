//! Viewer configuration.
//!
//! Loaded from an optional TOML file; every section and field has a
//! default so an empty file is valid. Command line flags are applied on
//! top by the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{editing::TransformMode, error::ConfigError};

/// Viewer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window configuration.
    pub window: WindowConfig,
    /// Initial camera placement and orbit limits.
    pub camera: CameraConfig,
    /// Asset lookup.
    pub assets: AssetConfig,
    /// Transform editing.
    pub editor: EditorConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vernissage".to_string(),
            width: 1280,
            height: 800,
            vsync: true,
        }
    }
}

/// Orbit camera configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the target.
    pub distance: f32,
    /// Elevation angle in radians.
    pub pitch: f32,
    /// Heading angle in radians, 0 looks down -Z.
    pub yaw: f32,
    /// Point the camera orbits.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
    /// Lowest elevation in radians; keeps the eye above the floor.
    pub min_pitch: f32,
    /// Radians of orbit per pixel of mouse travel.
    pub rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        // Eye at (0, 3, 10) looking at (0, 2, 0)
        Self {
            distance: 101.0_f32.sqrt(),
            pitch: 0.1_f32.atan(),
            yaw: 0.0,
            target: [0.0, 2.0, 0.0],
            fov_degrees: 60.0,
            min_distance: 3.0,
            max_distance: 25.0,
            min_pitch: std::f32::consts::FRAC_PI_2 - std::f32::consts::PI / 2.1,
            rotate_speed: 0.005,
        }
    }
}

/// Asset lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory that relative and root-relative asset URLs resolve against.
    pub root: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Transform editing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Start with edit mode on.
    pub edit_mode: bool,
    /// Initial gizmo mode.
    pub transform_mode: TransformMode,
    /// Radians (rotate) or scale factor (scale) per pixel of handle drag.
    /// Translation follows the cursor exactly.
    pub drag_sensitivity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edit_mode: false,
            transform_mode: TransformMode::Translate,
            drag_sensitivity: 0.01,
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.min_distance, 3.0);
        assert_eq!(config.camera.max_distance, 25.0);
        assert_eq!(config.editor.transform_mode, TransformMode::Translate);
        assert!(!config.editor.edit_mode);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ViewerConfig::from_toml(
            r#"
            [window]
            title = "Spring Show"

            [editor]
            edit_mode = true
            transform_mode = "rotate"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Spring Show");
        assert_eq!(config.window.height, 800);
        assert!(config.editor.edit_mode);
        assert_eq!(config.editor.transform_mode, TransformMode::Rotate);
        assert_eq!(config.editor.drag_sensitivity, 0.01);
    }

    #[test]
    fn default_camera_starts_in_front_of_the_room() {
        let camera = CameraConfig::default();
        let eye_y = camera.target[1] + camera.distance * camera.pitch.sin();
        let eye_z = camera.target[2] + camera.distance * camera.pitch.cos() * camera.yaw.cos();
        assert!((eye_y - 3.0).abs() < 1e-4);
        assert!((eye_z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn reports_bad_values() {
        assert!(ViewerConfig::from_toml("[window]\nwidth = \"wide\"").is_err());
        assert!(ViewerConfig::from_file("/nonexistent/vernissage.toml").is_err());
    }
}
