//! Rigid body state
//!
//! Position, orientation and velocities of one simulated body, plus the
//! helpers the ship code uses to move between body-local and world frames.

use glam::DVec2;

use crate::geometry::rotate_degrees;

/// Opaque handle to a body owned by a [`super::PhysicsBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Kinematic state of a rigid body.
///
/// Angles are radians (the physics convention); use
/// [`BodyState::angle_degrees`] for the block-authoring convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    pub position: DVec2,
    pub angle: f64,
    pub velocity: DVec2,
    pub angular_velocity: f64,
}

impl BodyState {
    pub fn at(position: DVec2, angle_degrees: f64) -> Self {
        Self {
            position,
            angle: angle_degrees.to_radians(),
            ..Self::default()
        }
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// Body-local vector expressed in world orientation (no translation).
    pub fn rotate_local(&self, local: DVec2) -> DVec2 {
        rotate_degrees(local, self.angle_degrees())
    }

    pub fn local_to_world(&self, local: DVec2) -> DVec2 {
        self.position + self.rotate_local(local)
    }

    /// Velocity of a point at world-frame offset `r` from the body origin:
    /// `v + ω × r`.
    pub fn point_velocity(&self, r: DVec2) -> DVec2 {
        self.velocity + self.angular_velocity * r.perp()
    }
}

/// Linear and angular velocity of a rigid body that best matches a set of
/// weighted point samples `(weight, offset, velocity)`.
///
/// The linear part is the weighted mean velocity; the angular part is the
/// weighted angular momentum about the weighted centre divided by the
/// weighted second moment, so samples taken from a single rigid motion give
/// back that motion exactly.
pub fn calculate_velocities(samples: &[(f64, DVec2, DVec2)]) -> (DVec2, f64) {
    let total: f64 = samples.iter().map(|(w, _, _)| *w).sum();
    if total <= 0.0 {
        return (DVec2::ZERO, 0.0);
    }
    let linear = samples.iter().map(|(w, _, v)| *v * *w).sum::<DVec2>() / total;
    let center = samples.iter().map(|(w, r, _)| *r * *w).sum::<DVec2>() / total;

    let mut momentum = 0.0;
    let mut second_moment = 0.0;
    for (w, r, v) in samples {
        let arm = *r - center;
        momentum += w * arm.perp_dot(*v - linear);
        second_moment += w * arm.length_squared();
    }
    let angular = if second_moment > 1e-12 {
        momentum / second_moment
    } else {
        0.0
    };
    (linear, angular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_to_world() {
        let state = BodyState::at(DVec2::new(10.0, 5.0), 90.0);
        let p = state.local_to_world(DVec2::new(1.0, 0.0));
        assert!((p - DVec2::new(10.0, 6.0)).length() < 1e-9);
    }

    #[test]
    fn test_point_velocity() {
        let state = BodyState {
            velocity: DVec2::new(1.0, 0.0),
            angular_velocity: 2.0,
            ..BodyState::default()
        };
        // ω × (3, 0) = (0, 6)
        assert_eq!(state.point_velocity(DVec2::new(3.0, 0.0)), DVec2::new(1.0, 6.0));
    }

    #[test]
    fn test_calculate_velocities_recovers_rigid_motion() {
        let truth = BodyState {
            velocity: DVec2::new(-3.0, 2.0),
            angular_velocity: 0.7,
            ..BodyState::default()
        };
        let offsets = [
            DVec2::new(1.0, 0.0),
            DVec2::new(-1.0, 0.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(0.0, -2.0),
        ];
        let samples: Vec<_> = offsets
            .iter()
            .map(|&r| (1.0, r, truth.point_velocity(r)))
            .collect();
        let (linear, angular) = calculate_velocities(&samples);
        assert!((linear - truth.velocity).length() < 1e-9);
        assert!((angular - truth.angular_velocity).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_velocities_empty() {
        assert_eq!(calculate_velocities(&[]), (DVec2::ZERO, 0.0));
    }
}
