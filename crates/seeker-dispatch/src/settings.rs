//! Configuration loading.
//!
//! Grid geometry lives in a TOML file (see `config/default.toml`) and is
//! deserialized into typed settings at startup.

use config::{Config, ConfigError, File, FileFormat};
use seeker_grid::map::GridConfig;
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Typed view of the dispatch configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Settings {
    /// Geometry of the planning grid.
    pub grid: GridConfig,
}

impl Settings {
    /// Loads settings from the default path, `config/default.toml`,
    /// relative to the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing or malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Loads settings from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing or malformed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        info!("Attempting to load configuration from {}", path);

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(true))
            .build()
            .and_then(|config| config.try_deserialize::<Settings>());

        match settings {
            Ok(settings) => {
                info!("Successfully loaded configuration: {:?}", settings);
                Ok(settings)
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                Err(e)
            }
        }
    }

    /// Parses settings from an in-memory TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the TOML is malformed or incomplete.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeker_grid::map::{Grid, Position};

    #[test]
    fn test_default_config_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let settings = Settings::from_file(path).unwrap();
        assert!(settings.grid.world_width > 0.0);
        assert!(settings.grid.world_height > 0.0);
        assert!(settings.grid.cell_radius > 0.0);
    }

    #[test]
    fn test_from_toml_str_builds_a_grid() {
        let settings = Settings::from_toml_str(
            r#"
            [grid]
            world_width = 8.0
            world_height = 6.0
            cell_radius = 0.25

            [grid.origin]
            x = 1.0
            y = -1.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.grid.origin, Position::new(1.0, -1.0));
        let grid = Grid::build(settings.grid, |_, _| false).unwrap();
        assert_eq!(grid.size_x(), 16);
        assert_eq!(grid.size_y(), 12);
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(Settings::from_file("config/does-not-exist.toml").is_err());
    }

    #[test]
    fn test_incomplete_toml_fails() {
        let result = Settings::from_toml_str(
            r#"
            [grid]
            world_width = 8.0
            "#,
        );
        assert!(result.is_err(), "missing fields must not default silently");
    }
}
