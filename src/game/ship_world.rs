//! Ship World
//!
//! Owns every ship and the physics backend they live in, and runs the fixed
//! tick: ships update, physics steps, collision reports become block damage,
//! and the fragment spawns and kills that damage produced run last.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::game::blocks::BlockId;
use crate::game::config::GameConfig;
use crate::game::ship::{
    DamageOutcome, FragmentSpawn, GunShot, Ship, ShipControls, ShipData, ShipError, ShipPreset,
};
use crate::game::structure::BlockStructure;
use crate::physics::{BodyHandle, BodyState, PhysicsBackend};
use crate::world::{FixedTimestepper, PostStepQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship {}", self.0)
    }
}

/// Work deferred until the current physics step has finished.
#[derive(Debug)]
pub enum ShipCommand {
    Spawn(FragmentSpawn),
    Kill(ShipId),
}

pub struct ShipWorld<P: PhysicsBackend> {
    physics: P,
    config: GameConfig,
    ships: BTreeMap<ShipId, Ship>,
    bodies: BTreeMap<BodyHandle, ShipId>,
    next_ship: u64,
    queue: PostStepQueue<ShipCommand>,
    stepper: FixedTimestepper,
    shots: Vec<(ShipId, GunShot)>,
    time: f64,
}

impl<P: PhysicsBackend> ShipWorld<P> {
    pub fn new(physics: P, config: GameConfig) -> Self {
        let stepper = FixedTimestepper::new(config.world.timestep);
        Self {
            physics,
            config,
            ships: BTreeMap::new(),
            bodies: BTreeMap::new(),
            next_ship: 0,
            queue: PostStepQueue::new(),
            stepper,
            shots: Vec::new(),
            time: 0.0,
        }
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Simulated seconds so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(&id)
    }

    pub fn ships(&self) -> impl Iterator<Item = (ShipId, &Ship)> + '_ {
        self.ships.iter().map(|(&id, ship)| (id, ship))
    }

    pub fn ship_ids(&self) -> Vec<ShipId> {
        self.ships.keys().copied().collect()
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn ship_for_body(&self, body: BodyHandle) -> Option<ShipId> {
        self.bodies.get(&body).copied()
    }

    pub fn body_state(&self, id: ShipId) -> Option<BodyState> {
        let ship = self.ships.get(&id)?;
        self.physics.body_state(ship.body())
    }

    pub fn spawn_ship(
        &mut self,
        structure: BlockStructure,
        state: BodyState,
    ) -> Result<ShipId, ShipError> {
        let ship = Ship::spawn(structure, state, self.config.ship.clone(), &mut self.physics)?;
        Ok(self.register(ship))
    }

    pub fn spawn_preset(
        &mut self,
        preset: ShipPreset,
        state: BodyState,
        hp: i32,
    ) -> Result<ShipId, ShipError> {
        let structure = preset.build(self.config.ship.block_side, hp)?;
        self.spawn_ship(structure, state)
    }

    pub fn load_ship(&mut self, data: &ShipData, state: BodyState) -> Result<ShipId, ShipError> {
        let ship = Ship::load(
            data,
            state,
            self.config.structure.clone(),
            self.config.ship.clone(),
            &mut self.physics,
        )?;
        Ok(self.register(ship))
    }

    /// Removes a ship and its body. Returns false for unknown ids.
    pub fn kill_ship(&mut self, id: ShipId) -> bool {
        let Some(ship) = self.ships.remove(&id) else {
            return false;
        };
        self.bodies.remove(&ship.body());
        ship.kill(&mut self.physics);
        debug!("Killed {}", id);
        true
    }

    pub fn set_controls(&mut self, id: ShipId, controls: ShipControls) -> bool {
        match self.ships.get_mut(&id) {
            Some(ship) => {
                ship.set_controls(controls);
                true
            }
            None => false,
        }
    }

    /// Applies `damage` to the block tagged `tag` on `body`. Hits on bodies
    /// or blocks that no longer exist do nothing. Fragments and kills are
    /// queued for the end of the tick.
    pub fn apply_hit(&mut self, body: BodyHandle, tag: u64, damage: i32) -> Option<DamageOutcome> {
        let id = self.ship_for_body(body)?;
        let ship = self.ships.get_mut(&id)?;
        if !ship.structure().contains(BlockId(tag)) {
            return None;
        }
        let mut outcome = ship.damage_block(BlockId(tag), damage, &mut self.physics);
        for fragment in outcome.fragments.drain(..) {
            self.queue.push(ShipCommand::Spawn(fragment));
        }
        if outcome.ship_destroyed {
            self.queue.push(ShipCommand::Kill(id));
        }
        Some(outcome)
    }

    /// Advances by a frame time, running as many fixed ticks as fit.
    pub fn tick(&mut self, dt: f64) -> usize {
        let mut stepper = self.stepper.clone();
        let steps = stepper.step(dt, |step| self.fixed_tick(step));
        self.stepper = stepper;
        steps
    }

    pub fn fixed_tick(&mut self, dt: f64) {
        for (&id, ship) in self.ships.iter_mut() {
            ship.update(dt, &mut self.physics);
            if ship.controls().fire {
                let shots = ship.fire_volley(&self.physics);
                self.shots.extend(shots.into_iter().map(|shot| (id, shot)));
            }
        }

        self.physics.step(dt);

        for report in self.physics.drain_collisions() {
            self.apply_hit(report.body, report.tag, report.damage);
        }

        self.run_post_step();
        self.time += dt;
    }

    /// Gun shots fired since the last drain, for the projectile system.
    pub fn drain_shots(&mut self) -> Vec<(ShipId, GunShot)> {
        std::mem::take(&mut self.shots)
    }

    fn run_post_step(&mut self) {
        for command in self.queue.drain() {
            match command {
                ShipCommand::Spawn(fragment) => {
                    let blocks = fragment.structure.len();
                    match self.spawn_ship(fragment.structure, fragment.state) {
                        Ok(id) => info!("Spawned fragment {} with {} blocks", id, blocks),
                        Err(e) => warn!("Failed to spawn fragment: {}", e),
                    }
                }
                ShipCommand::Kill(id) => {
                    self.kill_ship(id);
                }
            }
        }
    }

    fn register(&mut self, ship: Ship) -> ShipId {
        let id = ShipId(self.next_ship);
        self.next_ship += 1;
        self.bodies.insert(ship.body(), id);
        self.ships.insert(id, ship);
        id
    }
}
