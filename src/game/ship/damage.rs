//! Damage and splitting
//!
//! When a block's hit points run out it is removed. Blocks still joined to
//! the cockpit (block 0) stay with the ship; every other connected group
//! becomes a fragment, returned as a [`FragmentSpawn`] for the caller to
//! spawn after the physics step. Losing the cockpit turns every remaining
//! group into a fragment and destroys the ship.

use tracing::info;

use super::Ship;
use crate::game::blocks::BlockId;
use crate::game::structure::BlockStructure;
use crate::physics::{BodyState, PhysicsBackend, calculate_velocities};

/// The block every ship is anchored on.
pub const ROOT_BLOCK: BlockId = BlockId(0);

/// A detached group of blocks, already centred on its own origin, with the
/// body state that continues its pre-split motion.
#[derive(Debug, Clone)]
pub struct FragmentSpawn {
    pub structure: BlockStructure,
    pub state: BodyState,
}

#[derive(Debug, Default)]
pub struct DamageOutcome {
    pub destroyed_block: Option<BlockId>,
    pub fragments: Vec<FragmentSpawn>,
    /// No blocks remain; the caller should kill the ship.
    pub ship_destroyed: bool,
}

impl Ship {
    /// Subtracts `damage` from a block's hit points, destroying it at zero.
    /// Unknown blocks are ignored.
    pub fn damage_block(
        &mut self,
        id: BlockId,
        damage: i32,
        physics: &mut dyn PhysicsBackend,
    ) -> DamageOutcome {
        let Some(block) = self.structure.block_mut(id) else {
            return DamageOutcome::default();
        };
        block.hp -= damage;
        if block.hp > 0 {
            return DamageOutcome::default();
        }
        self.destroy_block(id, physics)
    }

    /// Removes a block and splits off whatever lost its connection to the
    /// cockpit. The surviving hull is re-centred without moving in the
    /// world, and its velocity is re-derived from the survivors' point
    /// velocities.
    pub fn destroy_block(&mut self, id: BlockId, physics: &mut dyn PhysicsBackend) -> DamageOutcome {
        let mut outcome = DamageOutcome::default();
        let Some(state) = physics.body_state(self.body) else {
            return outcome;
        };
        if self.structure.remove_block(id).is_none() {
            return outcome;
        }
        outcome.destroyed_block = Some(id);
        info!("Block {} of ship body {:?} destroyed", id, self.body);

        let anchor = if id == ROOT_BLOCK {
            None
        } else {
            self.structure.root()
        };
        let (_, fragments) = self.structure.partition_from(anchor);
        for members in fragments {
            let mut structure = self.structure.split_off(&members);
            let centre = state.rotate_local(structure.zero_centroid());
            let fragment_state = BodyState {
                position: state.position + centre,
                angle: state.angle,
                velocity: state.point_velocity(centre),
                angular_velocity: state.angular_velocity,
            };
            info!(
                "Ship body {:?} shed a fragment of {} blocks",
                self.body,
                structure.len()
            );
            outcome.fragments.push(FragmentSpawn {
                structure,
                state: fragment_state,
            });
        }

        if self.structure.is_empty() {
            info!("Ship body {:?} destroyed", self.body);
            outcome.ship_destroyed = true;
            return outcome;
        }

        let samples: Vec<_> = self
            .structure
            .blocks()
            .map(|(_, block)| {
                let offset = state.rotate_local(block.centroid());
                (block.area(), offset, state.point_velocity(offset))
            })
            .collect();
        let shift = self.structure.zero_centroid();
        let (velocity, angular_velocity) = calculate_velocities(&samples);
        let recentred = BodyState {
            position: state.position + state.rotate_local(shift),
            angle: state.angle,
            velocity,
            angular_velocity,
        };
        physics.set_body_state(self.body, recentred);
        physics.reshape(self.body, self.structure.create_collision_shape());
        self.refresh_mass(physics);
        self.reattach_components();
        outcome
    }
}
