//! Saved ship format
//!
//! ```yaml
//! block-structure:
//!   blocks: { 0: { vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]] } }
//!   connections: []
//! mass: 1.0
//! moment: 170.67
//! ```
//!
//! Files ending in `.json` use JSON; anything else is YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Ship, ShipError};
use crate::game::config::{ShipConfig, StructureConfig};
use crate::game::structure::{BlockStructure, LoadError, StructureData};
use crate::physics::{BodyState, PhysicsBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ShipData {
    pub block_structure: StructureData,
    pub mass: f64,
    pub moment: f64,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl ShipData {
    pub fn from_yaml_str(contents: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, LoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    pub fn save_file(&self, path: &Path) -> Result<(), LoadError> {
        let contents = if is_json(path) {
            self.to_json_string()?
        } else {
            self.to_yaml_string()?
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rebuilds the saved structure, centred on its centroid.
    pub fn into_structure(&self, config: StructureConfig) -> Result<BlockStructure, LoadError> {
        let mut structure = BlockStructure::load_data(&self.block_structure, config)?;
        structure.zero_centroid();
        Ok(structure)
    }
}

impl Ship {
    pub fn dump_data(&self) -> ShipData {
        ShipData {
            block_structure: self.structure.dump_data(),
            mass: self.mass,
            moment: self.moment,
        }
    }

    pub fn dump_string(&self) -> Result<String, LoadError> {
        self.dump_data().to_yaml_string()
    }

    pub fn dump_file(&self, path: &Path) -> Result<(), LoadError> {
        self.dump_data().save_file(path)
    }

    /// Spawns a saved ship with its saved mass and moment, its centroid on
    /// `state.position`.
    pub fn load(
        data: &ShipData,
        state: BodyState,
        structure_config: StructureConfig,
        config: ShipConfig,
        physics: &mut dyn PhysicsBackend,
    ) -> Result<Self, ShipError> {
        let structure = data.into_structure(structure_config)?;
        Self::spawn_with_mass(
            structure,
            state,
            Some((data.mass, data.moment)),
            config,
            physics,
        )
    }

    pub fn load_str(
        contents: &str,
        state: BodyState,
        structure_config: StructureConfig,
        config: ShipConfig,
        physics: &mut dyn PhysicsBackend,
    ) -> Result<Self, ShipError> {
        let data = ShipData::from_yaml_str(contents)?;
        Self::load(&data, state, structure_config, config, physics)
    }

    pub fn load_file(
        path: &Path,
        state: BodyState,
        structure_config: StructureConfig,
        config: ShipConfig,
        physics: &mut dyn PhysicsBackend,
    ) -> Result<Self, ShipError> {
        let data = ShipData::load_file(path)?;
        Self::load(&data, state, structure_config, config, physics)
    }
}
