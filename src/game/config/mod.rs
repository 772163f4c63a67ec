//! Config Module
//!
//! Centralized tuning for block attachment, ship physics and world pacing.
//! Every section has a `Default`; a TOML file only needs to list overrides.
//!
//! ```toml
//! [structure]
//! overlap_shrink_factor = 0.98
//!
//! [ship]
//! density = 0.002
//! ```

pub mod ship_config;
pub mod structure_config;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use ship_config::{ShipConfig, WorldConfig};
pub use structure_config::StructureConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub structure: StructureConfig,
    pub ship: ShipConfig,
    pub world: WorldConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, falling back to defaults (with a warning) on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!("{err}, using defaults");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            "[structure]\noverlap_shrink_factor = 0.95\n\n[ship]\ndensity = 0.5\n",
        )
        .unwrap();
        assert_eq!(config.structure.overlap_shrink_factor, 0.95);
        assert_eq!(config.structure.edge_overlap_epsilon, 1e-3);
        assert_eq!(config.ship.density, 0.5);
        assert_eq!(config.ship.block_side, 32.0);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = GameConfig::load_or_default(Path::new("definitely/not/here.toml"));
        assert_eq!(config, GameConfig::default());
        assert!(matches!(
            GameConfig::load(Path::new("definitely/not/here.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[ship]\ndensity = \"heavy\"").is_err());
    }
}
