//! Ship Controls
//!
//! Flags an input handler or AI sets every tick.

use crate::game::components::PowerKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShipControls {
    pub thrust: bool,
    pub brake: bool,
    /// -1 turns counter-clockwise, 1 clockwise, 0 lets spin damp out.
    pub turn: i8,
    pub turbo: bool,
    pub fire: bool,
}

impl ShipControls {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn turning(&self) -> bool {
        self.turn != 0
    }

    /// Releases the control fed by `key`. Returns false for keys that
    /// no control draws from.
    pub fn cut(&mut self, key: &PowerKey) -> bool {
        match key {
            PowerKey::Thrust => self.thrust = false,
            PowerKey::Brakes => self.brake = false,
            PowerKey::Turning => self.turn = 0,
            PowerKey::Turbo => self.turbo = false,
            PowerKey::Generator(_) | PowerKey::Named(_) => return false,
        }
        true
    }

    /// Subsystems that draw power under these controls.
    pub fn consumers(&self) -> [(PowerKey, bool); 4] {
        [
            (PowerKey::Thrust, self.thrust),
            (PowerKey::Brakes, self.brake),
            (PowerKey::Turning, self.turning()),
            (PowerKey::Turbo, self.turbo && self.thrust),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_releases_matching_control() {
        let mut controls = ShipControls {
            thrust: true,
            brake: true,
            turn: -1,
            turbo: true,
            fire: true,
        };
        assert!(controls.cut(&PowerKey::Turning));
        assert_eq!(controls.turn, 0);
        assert!(controls.cut(&PowerKey::Thrust));
        assert!(!controls.thrust);
        assert!(!controls.cut(&PowerKey::named("shields")));
        assert!(controls.brake && controls.turbo && controls.fire);
    }

    #[test]
    fn test_turbo_draws_only_while_thrusting() {
        let controls = ShipControls {
            turbo: true,
            ..ShipControls::idle()
        };
        assert!(controls.consumers().iter().all(|(_, on)| !on));
    }
}
