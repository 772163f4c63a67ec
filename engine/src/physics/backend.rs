//! Physics backend contract
//!
//! The block-structure core never integrates motion itself. Everything it
//! needs from a rigid-body engine goes through [`PhysicsBackend`]: turning
//! convex polygons into a body, reading and correcting body state after a
//! split, applying control forces, and reporting which shape was struck.

use glam::DVec2;

use super::body::{BodyHandle, BodyState};
use super::shape::ConvexPolygonShape;
use crate::geometry::moment_for_polygon;

/// A shape of `body` carrying `tag` was hit for `damage` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub body: BodyHandle,
    pub tag: u64,
    pub damage: i32,
}

pub trait PhysicsBackend {
    fn create_body(
        &mut self,
        state: BodyState,
        mass: f64,
        moment: f64,
        shapes: Vec<ConvexPolygonShape>,
    ) -> BodyHandle;

    /// Returns false when the handle is unknown.
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    /// Replaces every shape attached to `body`.
    fn reshape(&mut self, body: BodyHandle, shapes: Vec<ConvexPolygonShape>);

    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;

    fn set_body_state(&mut self, body: BodyHandle, state: BodyState);

    fn set_mass(&mut self, body: BodyHandle, mass: f64, moment: f64);

    /// Speed caps in world units per second and radians per second.
    fn set_velocity_limits(&mut self, _body: BodyHandle, _linear: f64, _angular: f64) {}

    /// Applies a world-frame `force` at world-frame `offset` from the body origin.
    fn apply_force(&mut self, body: BodyHandle, force: DVec2, offset: DVec2);

    fn reset_forces(&mut self, body: BodyHandle);

    fn step(&mut self, dt: f64);

    /// Collision reports gathered during the last step(s).
    ///
    /// Reports are handed out after the step so the caller can mutate
    /// shapes without racing the backend's own iteration.
    fn drain_collisions(&mut self) -> Vec<CollisionReport>;

    fn moment_for_polygon(&self, mass: f64, vertices: &[DVec2], offset: DVec2) -> f64 {
        moment_for_polygon(mass, vertices, offset)
    }
}
