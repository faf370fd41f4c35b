//! Viewer configuration.
//!
//! Every setting has a built-in default, so running without a config file shows
//! `cornell_box.obj` in an 800x600 window. A JSON file can override any subset of
//! the fields; see [`ViewerConfig::locate`] for where it is looked up.

use std::path::{Path, PathBuf};

use glam::{Vec3, Vec4};
use serde::Deserialize;
use thiserror::Error;

use crate::transform::Camera;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "objview.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub model_path: PathBuf,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub camera_front: Vec3,
    pub camera_up: Vec3,
    pub clear_color: Vec4,
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "objview".to_string(),
            width: 800,
            height: 600,
            model_path: PathBuf::from("cornell_box.obj"),
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            camera_position: Vec3::new(0.0, 0.0, 3.0),
            camera_front: Vec3::new(0.0, 0.0, -1.0),
            camera_up: Vec3::Y,
            clear_color: Vec4::new(0.2, 0.3, 0.3, 1.0),
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parses a config from JSON text. Missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the first existing config file out of `./objview.json` and
    /// `<config dir>/objview/config.json`.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        let user = dirs::config_dir().map(|dir| dir.join("objview").join("config.json"));

        std::iter::once(local)
            .chain(user)
            .find(|candidate| candidate.is_file())
    }

    /// Loads the located config file, or the defaults when there is none.
    /// The path the config came from is returned alongside it.
    pub fn load_or_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate() {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// The fixed camera described by this config.
    pub fn camera(&self) -> Camera {
        Camera {
            position: self.camera_position,
            front: self.camera_front,
            up: self.camera_up,
            fov_degrees: self.fov_degrees,
            aspect: self.aspect_ratio(),
            near: self.near,
            far: self.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.model_path, PathBuf::from("cornell_box.obj"));
        assert_eq!(config.fov_degrees, 45.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 100.0);
        assert_eq!(config.clear_color, Vec4::new(0.2, 0.3, 0.3, 1.0));
        assert!((config.aspect_ratio() - 800.0 / 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json(
            r#"{ "model_path": "teapot.obj", "camera_position": [1.0, 2.0, 5.0] }"#,
        )
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("teapot.obj"));
        assert_eq!(config.camera_position, Vec3::new(1.0, 2.0, 5.0));

        let defaults = ViewerConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.camera_front, defaults.camera_front);
        assert_eq!(config.far, defaults.far);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ViewerConfig::from_json(r#"{ "width": "wide" }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("objview-no-such-config.json");
        match ViewerConfig::load(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected an io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "objview-config-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "width": 1024, "height": 512 }"#).unwrap();
        let config = ViewerConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!((config.width, config.height), (1024, 512));
        assert_eq!(config.camera().aspect, 2.0);
    }
}
