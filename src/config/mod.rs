pub mod rendering;
pub mod window;

pub use rendering::RenderConfig;
pub use window::WindowConfig;

use crate::animation::OffsetParams;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "hello_triangle.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub rendering: RenderConfig,
    pub animation: OffsetParams,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first config file found in `candidates`, or defaults when
    /// none exists.
    pub fn load_from(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            None => {
                log::info!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// Working directory first, then the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&search_paths())
    }
}

pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dirs) = ProjectDirs::from("", "", "hello_triangle") {
        paths.push(dirs.config_dir().join(CONFIG_FILE));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&[dir.path().join(CONFIG_FILE)]).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window.title, "Hello Triangle");
        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert_eq!(config.animation, OffsetParams::default());
    }

    #[test]
    fn test_partial_file_overrides_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            [window]
            width = 1024

            [rendering]
            vsync = false

            [animation]
            step = 0.01
            "#
        )
        .unwrap();

        let config = AppConfig::load_from(&[PathBuf::from("missing.toml"), path]).unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.window.title, "Hello Triangle");
        assert!(!config.rendering.vsync);
        assert_eq!(
            config.rendering.shader_path,
            PathBuf::from("res/shaders/Base.shader")
        );
        assert_eq!(config.animation.step, 0.01);
        assert_eq!(config.animation.bound, 0.5);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[window\nwidth = ").unwrap();

        assert!(matches!(
            AppConfig::load_from(&[path]),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_search_starts_in_working_directory() {
        assert_eq!(search_paths()[0], PathBuf::from(CONFIG_FILE));
    }
}
