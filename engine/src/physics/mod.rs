//! Physics module
//!
//! The contract between the block-structure core and a rigid-body engine.
//! The core only ever talks to a [`PhysicsBackend`]; [`SimplePhysics`] is a
//! small reference backend used by tests and the sandbox binary.
//!
//! # Unit System
//!
//! - Distances in world units (one quad block is `ShipConfig::block_side` wide)
//! - Body angles in radians, block angles in degrees
//! - Mass derived from block area times a constant density
//!
//! # Submodules
//!
//! - [`body`] - Body handle/state and split velocity recomputation
//! - [`shape`] - Tagged convex polygon shapes
//! - [`backend`] - The [`PhysicsBackend`] trait and collision reports
//! - [`simple`] - Euler-integrated reference backend

pub mod backend;
pub mod body;
pub mod shape;
pub mod simple;

pub use backend::{CollisionReport, PhysicsBackend};
pub use body::{BodyHandle, BodyState, calculate_velocities};
pub use shape::ConvexPolygonShape;
pub use simple::SimplePhysics;
