//! Minimal in-process physics backend
//!
//! Explicit Euler integration of forces and torques with per-body speed
//! caps. It does no collision detection: collision reports are injected by
//! the caller (a real engine, a test, or a scripted sandbox) and handed back
//! from [`PhysicsBackend::drain_collisions`] after the next step.

use std::collections::BTreeMap;

use glam::DVec2;

use super::backend::{CollisionReport, PhysicsBackend};
use super::body::{BodyHandle, BodyState};
use super::shape::ConvexPolygonShape;

#[derive(Debug, Clone)]
struct SimpleBody {
    state: BodyState,
    mass: f64,
    moment: f64,
    shapes: Vec<ConvexPolygonShape>,
    force: DVec2,
    torque: f64,
    velocity_limit: f64,
    angular_velocity_limit: f64,
}

#[derive(Debug, Default)]
pub struct SimplePhysics {
    next_handle: u64,
    bodies: BTreeMap<BodyHandle, SimpleBody>,
    pending_collisions: Vec<CollisionReport>,
    collisions: Vec<CollisionReport>,
}

impl SimplePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn shapes(&self, body: BodyHandle) -> Option<&[ConvexPolygonShape]> {
        self.bodies.get(&body).map(|b| b.shapes.as_slice())
    }

    pub fn mass(&self, body: BodyHandle) -> Option<(f64, f64)> {
        self.bodies.get(&body).map(|b| (b.mass, b.moment))
    }

    /// Accumulated force and torque that the next step will apply.
    pub fn pending_force(&self, body: BodyHandle) -> Option<(DVec2, f64)> {
        self.bodies.get(&body).map(|b| (b.force, b.torque))
    }

    /// Queues a collision report; it is reported after the next step.
    pub fn inject_collision(&mut self, report: CollisionReport) {
        self.pending_collisions.push(report);
    }
}

impl PhysicsBackend for SimplePhysics {
    fn create_body(
        &mut self,
        state: BodyState,
        mass: f64,
        moment: f64,
        shapes: Vec<ConvexPolygonShape>,
    ) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            SimpleBody {
                state,
                mass,
                moment,
                shapes,
                force: DVec2::ZERO,
                torque: 0.0,
                velocity_limit: f64::INFINITY,
                angular_velocity_limit: f64::INFINITY,
            },
        );
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(&body).is_some()
    }

    fn reshape(&mut self, body: BodyHandle, shapes: Vec<ConvexPolygonShape>) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.shapes = shapes;
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.bodies.get(&body).map(|b| b.state)
    }

    fn set_body_state(&mut self, body: BodyHandle, state: BodyState) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.state = state;
        }
    }

    fn set_mass(&mut self, body: BodyHandle, mass: f64, moment: f64) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.mass = mass;
            b.moment = moment;
        }
    }

    fn set_velocity_limits(&mut self, body: BodyHandle, linear: f64, angular: f64) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity_limit = linear;
            b.angular_velocity_limit = angular;
        }
    }

    fn apply_force(&mut self, body: BodyHandle, force: DVec2, offset: DVec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.force += force;
            b.torque += offset.perp_dot(force);
        }
    }

    fn reset_forces(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.force = DVec2::ZERO;
            b.torque = 0.0;
        }
    }

    fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        for body in self.bodies.values_mut() {
            let s = &mut body.state;
            if body.mass > 0.0 {
                s.velocity += body.force / body.mass * dt;
            }
            if body.moment > 0.0 {
                s.angular_velocity += body.torque / body.moment * dt;
            }
            s.velocity = s.velocity.clamp_length_max(body.velocity_limit);
            s.angular_velocity = s
                .angular_velocity
                .clamp(-body.angular_velocity_limit, body.angular_velocity_limit);
            s.position += s.velocity * dt;
            s.angle += s.angular_velocity * dt;
        }
        self.collisions.append(&mut self.pending_collisions);
    }

    fn drain_collisions(&mut self) -> Vec<CollisionReport> {
        std::mem::take(&mut self.collisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_integration() {
        let mut physics = SimplePhysics::new();
        let body = physics.create_body(BodyState::default(), 2.0, 1.0, Vec::new());
        physics.apply_force(body, DVec2::new(4.0, 0.0), DVec2::ZERO);
        physics.step(0.5);
        let state = physics.body_state(body).unwrap();
        assert_eq!(state.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(state.position, DVec2::new(0.5, 0.0));
    }

    #[test]
    fn test_force_couple_produces_pure_torque() {
        let mut physics = SimplePhysics::new();
        let body = physics.create_body(BodyState::default(), 1.0, 1.0, Vec::new());
        physics.apply_force(body, DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0));
        physics.apply_force(body, DVec2::new(-1.0, 0.0), DVec2::new(0.0, -1.0));
        let (force, torque) = physics.pending_force(body).unwrap();
        assert_eq!(force, DVec2::ZERO);
        assert_eq!(torque, -2.0);
    }

    #[test]
    fn test_velocity_limits() {
        let mut physics = SimplePhysics::new();
        let body = physics.create_body(BodyState::default(), 1.0, 1.0, Vec::new());
        physics.set_velocity_limits(body, 3.0, 1.0);
        physics.apply_force(body, DVec2::new(100.0, 0.0), DVec2::new(0.0, 1.0));
        physics.step(1.0);
        let state = physics.body_state(body).unwrap();
        assert!((state.velocity.length() - 3.0).abs() < 1e-12);
        assert!((state.angular_velocity + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_injected_collisions_report_after_step() {
        let mut physics = SimplePhysics::new();
        let body = physics.create_body(BodyState::default(), 1.0, 1.0, Vec::new());
        physics.inject_collision(CollisionReport { body, tag: 3, damage: 1 });
        assert!(physics.drain_collisions().is_empty());
        physics.step(0.01);
        let reports = physics.drain_collisions();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].tag, 3);
        assert!(physics.drain_collisions().is_empty());
    }

    #[test]
    fn test_remove_body() {
        let mut physics = SimplePhysics::new();
        let body = physics.create_body(BodyState::default(), 1.0, 1.0, Vec::new());
        assert!(physics.remove_body(body));
        assert!(!physics.remove_body(body));
        assert!(physics.body_state(body).is_none());
    }
}
