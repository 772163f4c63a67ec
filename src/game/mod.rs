//! Game Module
//!
//! Block-built ships on top of the engine's geometry and physics contract.
//!
//! # Modules
//!
//! - [`blocks`] - Convex polygon blocks and their saved form
//! - [`components`] - Engines, guns, generators, batteries and the power supply
//! - [`config`] - TOML-loadable tuning
//! - [`structure`] - Block graph, edge-mating attachment and connectivity
//! - [`ship`] - A structure bound to a physics body, plus damage and presets
//! - [`ship_world`] - Every ship in one physics world, stepped at a fixed rate

pub mod blocks;
pub mod components;
pub mod config;
pub mod ship;
pub mod ship_world;
pub mod structure;

pub use blocks::{BlockData, BlockId, PolygonBlock};
pub use components::{Component, ComponentKind, ComponentRef, PowerKey, PowerSupply};
pub use config::{ConfigError, GameConfig, ShipConfig, StructureConfig, WorldConfig};
pub use ship::{
    DamageOutcome, FragmentSpawn, GunShot, Ship, ShipControls, ShipData, ShipError, ShipPreset,
};
pub use ship_world::{ShipCommand, ShipId, ShipWorld};
pub use structure::{AttachError, BlockStructure, Connection, EdgeRef, LoadError, StructureData};
