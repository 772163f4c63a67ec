//! Ship Configuration
//!
//! Mass, motion and timing parameters for ships and the world they fly in.

use serde::{Deserialize, Serialize};

/// Per-ship physical tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Mass per unit of block area
    pub density: f64,
    /// Linear speed cap (world units per second)
    pub velocity_limit: f64,
    /// Angular speed cap (degrees per second)
    pub angular_velocity_limit_degrees: f64,
    /// Thrust multiplier while turbo is held
    pub turbo_multiplier: f64,
    /// Lever arm of the turning force couple
    pub rotation_distance: f64,
    /// Side length of the stock quad block
    pub block_side: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            density: 1.0 / 1024.0,
            velocity_limit: 700.0,
            angular_velocity_limit_degrees: 360.0,
            turbo_multiplier: 2.0,
            rotation_distance: 100.0,
            block_side: 32.0,
        }
    }
}

/// Simulation pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed simulation step (seconds)
    pub timestep: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { timestep: 0.01 }
    }
}
