//! Components Module
//!
//! Engines, guns, generators and batteries mounted on blocks, and the
//! per-ship power pool they draw from.

pub mod component;
pub mod power;

pub use component::{
    Component, ComponentKind, ComponentRef, DEFAULT_ENGINE_COST, DEFAULT_ENGINE_POWER,
    DEFAULT_GUN_COOLDOWN, DEFAULT_GUN_COST, LastUsed, with_engine, with_gun, with_guns,
};
pub use power::{PowerKey, PowerReport, PowerSupply};
