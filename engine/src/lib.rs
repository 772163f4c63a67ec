//! Hullsmith Engine Library
//!
//! Ships built from convex polygon blocks that mate edge to edge, carry
//! engines and guns on their free faces, and break into independent
//! fragments when a block is shot out.
//!
//! # Modules
//!
//! - [`geometry`] - Degree-based angles, directed edges and polygon helpers
//! - [`physics`] - The rigid-body backend contract and a reference backend
//! - [`world`] - Fixed-timestep pacing and the post-step command queue
//! - [`game`] - Blocks, structures, components, ships and the ship world
//!
//! # Example
//!
//! ```ignore
//! use hullsmith_engine::game::{GameConfig, ShipPreset, ShipWorld};
//! use hullsmith_engine::physics::{BodyState, SimplePhysics};
//!
//! let mut world = ShipWorld::new(SimplePhysics::new(), GameConfig::default());
//! let ship = world.spawn_preset(ShipPreset::Small, BodyState::default(), 10)?;
//! world.tick(1.0 / 60.0);
//! ```

pub mod geometry;
pub mod physics;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use geometry::{Edge, almost_equal, normalize_degrees, polar_degrees, rotate_degrees};
pub use physics::{BodyHandle, BodyState, CollisionReport, PhysicsBackend, SimplePhysics};
pub use world::{FixedTimestepper, PostStepQueue};
