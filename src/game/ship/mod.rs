//! Ship
//!
//! A ship ties one [`BlockStructure`] and one [`PowerSupply`] to one
//! physics body. The structure is kept centred on the body origin; every
//! structural change re-centres it, corrects the body position by the
//! shift, and rebuilds shapes, mass and component bookkeeping.
//!
//! # Submodules
//!
//! - [`controls`] - Control flags set by input or AI
//! - [`damage`] - Block destruction and the split into fragments
//! - [`persistence`] - Saved ship format
//! - [`presets`] - Stock hull layouts

pub mod controls;
pub mod damage;
pub mod persistence;
pub mod presets;

use glam::DVec2;
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::components::{Component, ComponentKind, ComponentRef, PowerKey, PowerSupply};
use crate::game::config::ShipConfig;
use crate::game::structure::{AttachError, BlockStructure, LoadError};
use crate::geometry::polar_degrees;
use crate::physics::{BodyHandle, BodyState, PhysicsBackend};

pub use controls::ShipControls;
pub use damage::{DamageOutcome, FragmentSpawn};
pub use persistence::ShipData;
pub use presets::ShipPreset;

#[derive(Debug, Error)]
pub enum ShipError {
    #[error("cannot spawn a ship without blocks")]
    EmptyStructure,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to assemble hull: {0}")]
    Attach(#[from] AttachError),
}

/// One projectile request produced by [`Ship::fire_volley`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunShot {
    pub gun: ComponentRef,
    pub position: DVec2,
    pub direction: DVec2,
    /// Muzzle velocity inherited from the ship.
    pub velocity: DVec2,
}

#[derive(Debug)]
pub struct Ship {
    structure: BlockStructure,
    psu: PowerSupply,
    body: BodyHandle,
    config: ShipConfig,
    controls: ShipControls,
    engines: Vec<ComponentRef>,
    guns: Vec<ComponentRef>,
    thrust_power: f64,
    brake_power: f64,
    turn_power: f64,
    engine_power_drain: f64,
    mass: f64,
    moment: f64,
    clock: f64,
    shot_sequence: u64,
}

impl Ship {
    /// Spawns a ship with mass and moment derived from block area.
    pub fn spawn(
        structure: BlockStructure,
        state: BodyState,
        config: ShipConfig,
        physics: &mut dyn PhysicsBackend,
    ) -> Result<Self, ShipError> {
        Self::spawn_with_mass(structure, state, None, config, physics)
    }

    /// Spawns a ship, centring the structure on the body origin.
    ///
    /// `state.position` is where the structure's current origin ends up;
    /// the body itself sits on the structure's centroid. With
    /// `mass_moment` unset, mass is area times density and the moment sums
    /// every block's polygon moment about the centroid. Stored power
    /// starts full.
    pub fn spawn_with_mass(
        mut structure: BlockStructure,
        mut state: BodyState,
        mass_moment: Option<(f64, f64)>,
        config: ShipConfig,
        physics: &mut dyn PhysicsBackend,
    ) -> Result<Self, ShipError> {
        if structure.is_empty() {
            return Err(ShipError::EmptyStructure);
        }
        let shift = structure.zero_centroid();
        state.position += state.rotate_local(shift);

        let (mass, moment) =
            mass_moment.unwrap_or_else(|| mass_properties(&structure, config.density, physics));
        let body = physics.create_body(state, mass, moment, structure.create_collision_shape());
        physics.set_velocity_limits(
            body,
            config.velocity_limit,
            config.angular_velocity_limit_degrees.to_radians(),
        );

        let mut ship = Self {
            structure,
            psu: PowerSupply::new(0.0),
            body,
            config,
            controls: ShipControls::default(),
            engines: Vec::new(),
            guns: Vec::new(),
            thrust_power: 0.0,
            brake_power: 0.0,
            turn_power: 0.0,
            engine_power_drain: 0.0,
            mass,
            moment,
            clock: 0.0,
            shot_sequence: 0,
        };
        ship.reattach_components();
        ship.psu.set_power(ship.psu.max_storage());
        debug!("Spawned ship body {:?}: {}", body, ship.summarize());
        Ok(ship)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn structure(&self) -> &BlockStructure {
        &self.structure
    }

    pub fn psu(&self) -> &PowerSupply {
        &self.psu
    }

    pub fn psu_mut(&mut self) -> &mut PowerSupply {
        &mut self.psu
    }

    pub fn config(&self) -> &ShipConfig {
        &self.config
    }

    pub fn controls(&self) -> ShipControls {
        self.controls
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn moment(&self) -> f64 {
        self.moment
    }

    pub fn thrust_power(&self) -> f64 {
        self.thrust_power
    }

    pub fn brake_power(&self) -> f64 {
        self.brake_power
    }

    pub fn turn_power(&self) -> f64 {
        self.turn_power
    }

    pub fn engine_power_drain(&self) -> f64 {
        self.engine_power_drain
    }

    /// Seconds of simulation this ship has seen.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn component(&self, r: ComponentRef) -> Option<&Component> {
        self.structure.block(r.block)?.components.get(r.index)
    }

    /// Sets the control flags and the matching subsystem consumption.
    pub fn set_controls(&mut self, controls: ShipControls) {
        self.controls = controls;
        for (key, on) in controls.consumers() {
            let rate = if on { self.engine_power_drain } else { 0.0 };
            self.psu.set_consumption(key, rate);
        }
    }

    /// Failure hook for a consumer the supply could not pay.
    pub fn lose_power(&mut self, key: &PowerKey) {
        let mut controls = self.controls;
        if controls.cut(key) {
            debug!("Ship body {:?} lost power for {}", self.body, key);
            self.set_controls(controls);
        } else {
            warn!("Ship body {:?} lost power for unknown consumer {}", self.body, key);
        }
    }

    /// Rebuilds engine/gun lists, movement powers and the power supply from
    /// the components on currently active mounts. Stored power is kept, up
    /// to the new capacity.
    pub fn reattach_components(&mut self) {
        let power = self.psu.power();
        self.psu = PowerSupply::new(0.0);
        self.engines.clear();
        self.guns.clear();
        self.thrust_power = 0.0;
        self.brake_power = 0.0;
        self.turn_power = 0.0;
        self.engine_power_drain = 0.0;

        for (id, block) in self.structure.blocks() {
            for (index, component) in block.components.iter().enumerate() {
                if !component.is_active(block) {
                    continue;
                }
                let r = ComponentRef { block: id, index };
                match component.kind {
                    ComponentKind::Engine { power, cost } => {
                        self.engines.push(r);
                        self.thrust_power += power;
                        self.brake_power += 0.5 * power;
                        self.turn_power += 0.25 * power;
                        self.engine_power_drain += cost;
                    }
                    ComponentKind::Gun { .. } => self.guns.push(r),
                    ComponentKind::Generator { production } => {
                        self.psu.set_production(PowerKey::Generator(r), production);
                    }
                    ComponentKind::Battery { storage } => self.psu.add_capacity(storage),
                    ComponentKind::Cockpit => {}
                }
            }
        }
        self.psu.set_power(power);
        self.set_controls(self.controls);
    }

    /// Engines on free mounts.
    pub fn all_engines(&self) -> Vec<ComponentRef> {
        self.engines
            .iter()
            .copied()
            .filter(|&r| self.mount_is_active(r))
            .collect()
    }

    /// Guns on free mounts, least recently used first.
    pub fn all_guns(&self) -> Vec<ComponentRef> {
        let mut guns: Vec<ComponentRef> = self
            .guns
            .iter()
            .copied()
            .filter(|&r| self.mount_is_active(r))
            .collect();
        self.sort_by_last_use(&mut guns);
        guns
    }

    /// Guns that could fire right now, least recently used first.
    pub fn ready_guns(&self) -> Vec<ComponentRef> {
        let mut guns: Vec<ComponentRef> = self
            .guns
            .iter()
            .copied()
            .filter(|&r| {
                self.structure.block(r.block).is_some_and(|block| {
                    block
                        .components
                        .get(r.index)
                        .is_some_and(|c| c.may_activate(block, &self.psu, self.clock))
                })
            })
            .collect();
        self.sort_by_last_use(&mut guns);
        guns
    }

    pub fn may_fire(&self) -> bool {
        !self.ready_guns().is_empty()
    }

    /// Fires every ready gun in least-recently-used order while power
    /// lasts.
    pub fn fire_volley(&mut self, physics: &dyn PhysicsBackend) -> Vec<GunShot> {
        let Some(state) = physics.body_state(self.body) else {
            return Vec::new();
        };
        let now = self.clock;
        let mut shots = Vec::new();
        for gun in self.ready_guns() {
            let Some(block) = self.structure.block_mut(gun.block) else {
                continue;
            };
            let shot = match block.components.get(gun.index) {
                Some(c) if c.may_activate(block, &self.psu, now) => GunShot {
                    gun,
                    position: c.world_position(block, &state),
                    direction: c.world_direction(block, &state),
                    velocity: c.world_velocity(block, &state),
                },
                _ => continue,
            };
            let Some(component) = block.components.get_mut(gun.index) else {
                continue;
            };
            if component.activated(now, self.shot_sequence, &mut self.psu) {
                self.shot_sequence += 1;
                shots.push(shot);
            }
        }
        shots
    }

    /// Advances power and applies control forces for one fixed step.
    pub fn update(&mut self, dt: f64, physics: &mut dyn PhysicsBackend) {
        self.clock += dt;
        let report = self.psu.tick(dt);
        for key in &report.starved {
            self.lose_power(key);
        }

        let Some(mut state) = physics.body_state(self.body) else {
            return;
        };
        physics.reset_forces(self.body);
        let mut state_changed = false;

        let rotation_distance = self.config.rotation_distance;
        let mut spin = f64::from(self.controls.turn);
        if spin == 0.0 {
            // Counter-steer until the remaining spin is below one step's worth
            let delta_angular_momentum = self.turn_power * rotation_distance * dt;
            let angular_momentum = state.angular_velocity * self.moment;
            if angular_momentum.abs() > delta_angular_momentum {
                spin = angular_momentum.signum();
            } else if state.angular_velocity != 0.0 {
                state.angular_velocity = 0.0;
                state_changed = true;
            }
        }
        // Positive spin yields clockwise (negative) torque
        let rotation_force = DVec2::new(self.turn_power * spin, 0.0);
        let rotation_offset = DVec2::new(0.0, rotation_distance);
        physics.apply_force(self.body, rotation_force, rotation_offset);
        physics.apply_force(self.body, -rotation_force, -rotation_offset);

        let mut force = DVec2::ZERO;
        if self.controls.thrust {
            let multiplier = if self.controls.turbo {
                self.config.turbo_multiplier
            } else {
                1.0
            };
            force += polar_degrees(state.angle_degrees(), multiplier * self.thrust_power);
        }
        if self.controls.brake {
            if state.velocity.length() < self.brake_power * 0.01 {
                force = DVec2::ZERO;
                state.velocity = DVec2::ZERO;
                state_changed = true;
            } else {
                force -= state.velocity.normalize_or_zero() * self.brake_power;
            }
        }
        if state_changed {
            physics.set_body_state(self.body, state);
        }
        physics.apply_force(self.body, force, DVec2::ZERO);
    }

    /// Removes the body from the physics backend.
    pub fn kill(self, physics: &mut dyn PhysicsBackend) {
        physics.remove_body(self.body);
    }

    pub fn summarize(&self) -> String {
        format!(
            "{} blocks, {:.0}/{:.0} power, movement {}/{}/{} ({})",
            self.structure.len(),
            self.psu.power(),
            self.psu.max_storage(),
            self.thrust_power,
            self.turn_power,
            self.brake_power,
            self.engine_power_drain
        )
    }

    fn mount_is_active(&self, r: ComponentRef) -> bool {
        self.structure
            .block(r.block)
            .is_some_and(|block| block.components.get(r.index).is_some_and(|c| c.is_active(block)))
    }

    fn sort_by_last_use(&self, refs: &mut [ComponentRef]) {
        let usage = |r: &ComponentRef| {
            self.component(*r)
                .and_then(Component::last_used)
                .map_or((f64::NEG_INFINITY, 0), |u| (u.time, u.sequence))
        };
        refs.sort_by(|a, b| {
            let (ta, sa) = usage(a);
            let (tb, sb) = usage(b);
            ta.total_cmp(&tb).then(sa.cmp(&sb))
        });
    }

    /// Mass and moment recomputed from block area after a structural change.
    fn refresh_mass(&mut self, physics: &mut dyn PhysicsBackend) {
        let (mass, moment) = mass_properties(&self.structure, self.config.density, physics);
        if mass > 0.0 {
            self.mass = mass;
            self.moment = moment;
            physics.set_mass(self.body, mass, moment);
        }
    }
}

/// Area-derived mass and the summed polygon moment of every block about the
/// structure origin.
fn mass_properties(
    structure: &BlockStructure,
    density: f64,
    physics: &dyn PhysicsBackend,
) -> (f64, f64) {
    let mass = structure.area() * density;
    let moment = structure
        .blocks()
        .map(|(_, block)| {
            physics.moment_for_polygon(block.area() * density, &block.vertices(), DVec2::ZERO)
        })
        .sum();
    (mass, moment)
}
