//! Component
//!
//! A functional attachment mounted on one block. Whether it works depends on
//! the block's free edges: an engine nozzle or gun barrel on an edge that
//! another block now covers is inactive.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::power::PowerSupply;
use crate::game::blocks::{BlockId, PolygonBlock};
use crate::geometry::{normalize_degrees, unit_from_degrees};
use crate::physics::BodyState;

pub const DEFAULT_ENGINE_POWER: f64 = 500.0;
pub const DEFAULT_ENGINE_COST: f64 = 50.0;
pub const DEFAULT_GUN_COOLDOWN: f64 = 0.2;
pub const DEFAULT_GUN_COST: f64 = 750.0 * DEFAULT_GUN_COOLDOWN * 2.0 / 3.0;

/// Addresses a component as (block, index into the block's component list).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ComponentRef {
    pub block: BlockId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Adds `power` thrust; drains `cost` per second while the engine runs.
    Engine { power: f64, cost: f64 },
    /// Fires at most once per `cooldown` seconds, paying `cost` per shot.
    Gun { cooldown: f64, cost: f64 },
    Generator { production: f64 },
    Battery { storage: f64 },
    Cockpit,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Engine { .. } => "engine",
            ComponentKind::Gun { .. } => "gun",
            ComponentKind::Generator { .. } => "generator",
            ComponentKind::Battery { .. } => "battery",
            ComponentKind::Cockpit => "cockpit",
        }
    }

    pub fn is_engine(&self) -> bool {
        matches!(self, ComponentKind::Engine { .. })
    }

    pub fn is_gun(&self) -> bool {
        matches!(self, ComponentKind::Gun { .. })
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, ComponentKind::Generator { .. })
    }

    pub fn is_battery(&self) -> bool {
        matches!(self, ComponentKind::Battery { .. })
    }

    pub fn is_cockpit(&self) -> bool {
        matches!(self, ComponentKind::Cockpit)
    }

    pub fn power_usage(&self) -> Option<f64> {
        match *self {
            ComponentKind::Engine { cost, .. } | ComponentKind::Gun { cost, .. } => Some(cost),
            _ => None,
        }
    }

    pub fn power_production(&self) -> Option<f64> {
        match *self {
            ComponentKind::Generator { production } => Some(production),
            _ => None,
        }
    }

    pub fn power_capacity(&self) -> Option<f64> {
        match *self {
            ComponentKind::Battery { storage } => Some(storage),
            _ => None,
        }
    }

    pub fn cooldown(&self) -> Option<f64> {
        match *self {
            ComponentKind::Gun { cooldown, .. } => Some(cooldown),
            _ => None,
        }
    }
}

/// When a component last fired; `sequence` breaks ties within one instant.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct LastUsed {
    pub time: f64,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Component {
    #[serde(flatten)]
    pub kind: ComponentKind,
    /// Edges of the owning block that must stay free.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_edges: Vec<usize>,
    /// Mount point in the block's authoring frame.
    #[serde(default)]
    pub position: DVec2,
    #[serde(default)]
    pub angle_degrees: f64,
    #[serde(skip)]
    cooldown_until: Option<f64>,
    #[serde(skip)]
    last_used: Option<LastUsed>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            required_edges: Vec::new(),
            position: DVec2::ZERO,
            angle_degrees: 0.0,
            cooldown_until: None,
            last_used: None,
        }
    }

    pub fn requiring_edges(mut self, edges: impl IntoIterator<Item = usize>) -> Self {
        self.required_edges.extend(edges);
        self
    }

    pub fn mounted_at(mut self, position: DVec2, angle_degrees: f64) -> Self {
        self.position = position;
        self.angle_degrees = normalize_degrees(angle_degrees);
        self
    }

    /// Copy with the mount carried into `block`'s structure frame.
    pub fn placed(&self, block: &PolygonBlock) -> Self {
        let mut placed = self.clone();
        placed.position = block.transform_point(self.position);
        placed.angle_degrees = normalize_degrees(self.angle_degrees + block.rotation_degrees());
        placed
    }

    pub fn is_active(&self, block: &PolygonBlock) -> bool {
        self.required_edges.iter().all(|&e| block.is_edge_free(e))
    }

    pub fn in_cooldown(&self, now: f64) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    pub fn cooldown_until(&self) -> Option<f64> {
        self.cooldown_until
    }

    pub fn last_used(&self) -> Option<LastUsed> {
        self.last_used
    }

    pub fn may_activate(&self, block: &PolygonBlock, psu: &PowerSupply, now: f64) -> bool {
        self.is_active(block)
            && !self.in_cooldown(now)
            && psu.may_consume(self.kind.power_usage().unwrap_or(0.0))
    }

    /// Starts the cooldown, pays the activation cost and stamps the use.
    /// Returns false (changing nothing) when the cost cannot be paid.
    pub fn activated(&mut self, now: f64, sequence: u64, psu: &mut PowerSupply) -> bool {
        if !psu.consume(self.kind.power_usage().unwrap_or(0.0)) {
            return false;
        }
        if let Some(cooldown) = self.kind.cooldown() {
            self.cooldown_until = Some(now + cooldown);
        }
        self.last_used = Some(LastUsed {
            time: now,
            sequence,
        });
        true
    }

    /// Mount point relative to the body origin, rotated into the world frame.
    pub fn world_offset(&self, block: &PolygonBlock, body: &BodyState) -> DVec2 {
        body.rotate_local(block.transform_point(self.position))
    }

    pub fn world_position(&self, block: &PolygonBlock, body: &BodyState) -> DVec2 {
        body.position + self.world_offset(block, body)
    }

    pub fn world_angle_degrees(&self, block: &PolygonBlock, body: &BodyState) -> f64 {
        normalize_degrees(self.angle_degrees + block.rotation_degrees() + body.angle_degrees())
    }

    pub fn world_direction(&self, block: &PolygonBlock, body: &BodyState) -> DVec2 {
        unit_from_degrees(self.world_angle_degrees(block, body))
    }

    pub fn world_velocity(&self, block: &PolygonBlock, body: &BodyState) -> DVec2 {
        body.point_velocity(self.world_offset(block, body))
    }
}

fn edge_mount(block: &PolygonBlock, edge: usize, kind: ComponentKind) -> Option<Component> {
    let mount = block.authoring_edge(edge)?;
    Some(
        Component::new(kind)
            .requiring_edges([edge])
            .mounted_at(mount.midpoint(), mount.angle_degrees()),
    )
}

/// Mounts an engine at the midpoint of `edge`, exhausting outward. Edges the
/// block does not have are skipped.
pub fn with_engine(mut block: PolygonBlock, edge: usize, power: f64, cost: f64) -> PolygonBlock {
    if let Some(engine) = edge_mount(&block, edge, ComponentKind::Engine { power, cost }) {
        block.components.push(engine);
    }
    block
}

/// Mounts a gun at the midpoint of `edge`, firing outward.
pub fn with_gun(mut block: PolygonBlock, edge: usize, cooldown: f64, cost: f64) -> PolygonBlock {
    if let Some(gun) = edge_mount(&block, edge, ComponentKind::Gun { cooldown, cost }) {
        block.components.push(gun);
    }
    block
}

/// A default gun on every edge.
pub fn with_guns(block: PolygonBlock) -> PolygonBlock {
    (0..block.edge_count()).fold(block, |b, edge| {
        with_gun(b, edge, DEFAULT_GUN_COOLDOWN, DEFAULT_GUN_COST)
    })
}
