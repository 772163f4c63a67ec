//! Stock hull layouts.
//!
//! Preset quads are wound so edge 0 faces forward (+x), edge 1 up, edge 2
//! back and edge 3 down. Engines default to the back edge and guns to the
//! front edge.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;

use crate::game::blocks::{BlockId, PolygonBlock};
use crate::game::components::{
    Component, ComponentKind, DEFAULT_ENGINE_COST, DEFAULT_ENGINE_POWER, DEFAULT_GUN_COOLDOWN,
    DEFAULT_GUN_COST, with_engine, with_gun, with_guns,
};
use crate::game::structure::{AttachError, BlockStructure};

pub const COCKPIT_COLOUR: [u8; 3] = [0, 255, 0];
pub const ARMOUR_COLOUR: [u8; 3] = [64, 64, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipPreset {
    Small,
    Big,
    Bigger,
    Long,
    Wide,
    Octa,
    Single,
    SingleWeird,
}

impl ShipPreset {
    pub const ALL: [ShipPreset; 8] = [
        ShipPreset::Small,
        ShipPreset::Big,
        ShipPreset::Bigger,
        ShipPreset::Long,
        ShipPreset::Wide,
        ShipPreset::Octa,
        ShipPreset::Single,
        ShipPreset::SingleWeird,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShipPreset::Small => "small",
            ShipPreset::Big => "big",
            ShipPreset::Bigger => "bigger",
            ShipPreset::Long => "long",
            ShipPreset::Wide => "wide",
            ShipPreset::Octa => "octa",
            ShipPreset::Single => "single",
            ShipPreset::SingleWeird => "single_weird",
        }
    }

    /// Builds and outfits the hull from blocks of side `side`, giving every
    /// block `hp` hit points before armour and cockpit bonuses.
    pub fn build(&self, side: f64, hp: i32) -> Result<BlockStructure, AttachError> {
        let mut s = self.layout(side)?;
        outfit(&mut s, hp);
        Ok(s)
    }

    fn layout(&self, side: f64) -> Result<BlockStructure, AttachError> {
        let quad = || quad_block(side);
        let engine = |b: PolygonBlock| with_engine(b, 2, DEFAULT_ENGINE_POWER, DEFAULT_ENGINE_COST);
        let gun_on = |b: PolygonBlock, edge: usize| {
            with_gun(b, edge, DEFAULT_GUN_COOLDOWN, DEFAULT_GUN_COST)
        };
        let gun = |b: PolygonBlock| gun_on(b, 0);
        let root = BlockId(0);

        let s = match self {
            ShipPreset::Small => {
                let mut s = BlockStructure::new(engine(gun(quad())));
                s.attach((root, 3), engine(gun(quad())), 1)?;
                s.attach((root, 0), engine(gun(quad())), 2)?;
                s.attach((root, 1), engine(with_guns(quad())), 3)?;
                s
            }
            ShipPreset::Big | ShipPreset::Bigger => {
                let bigger = *self == ShipPreset::Bigger;
                let block = || {
                    if bigger {
                        gun(engine(quad()))
                    } else {
                        engine(quad())
                    }
                };
                let mut s = BlockStructure::new(block());
                let rows: &[u64] = if bigger { &[0, 3, 6] } else { &[0, 3] };
                for &row in rows {
                    let centre = BlockId(row);
                    s.attach((centre, 2), block(), 0)?;
                    s.attach((centre, 0), block(), 2)?;
                    let last = !bigger && row == 3;
                    let next = if last { engine(gun_on(quad(), 1)) } else { block() };
                    s.attach((centre, 1), next, 3)?;
                }
                s
            }
            ShipPreset::SingleWeird => {
                BlockStructure::new(gun(engine(PolygonBlock::regular(5, side))))
            }
            ShipPreset::Single => BlockStructure::new(with_guns(quad())),
            ShipPreset::Octa => {
                let mut s = BlockStructure::new(with_guns(PolygonBlock::regular(8, side)));
                for i in 0..7 {
                    let a = s.attach((root, i), quad(), 0)?;
                    let b = s.attach((a, 2), quad(), 0)?;
                    let c = s.attach((b, 2), quad(), 0)?;
                    s.attach((c, 1), gun_on(quad(), 1), 3)?;
                }
                s
            }
            ShipPreset::Wide => {
                let wing = || with_guns(engine(quad()));
                let mut s = BlockStructure::new(wing());
                s.attach((root, 1), engine(with_guns(quad())), 3)?;
                let (mut left, mut right) = (root, root);
                for _ in 0..7 {
                    left = s.attach((left, 2), wing(), 0)?;
                    right = s.attach((right, 0), wing(), 2)?;
                }
                s
            }
            ShipPreset::Long => {
                let mut s = BlockStructure::new(quad());
                let (mut below, mut above) = (root, root);
                for _ in 0..6 {
                    below = s.attach((below, 3), with_guns(quad()), 1)?;
                    above = s.attach((above, 1), with_guns(quad()), 3)?;
                }
                s
            }
        };
        Ok(s)
    }
}

impl fmt::Display for ShipPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown ship preset '{s}'"))
    }
}

/// Square with edge 0 facing +x.
pub fn quad_block(side: f64) -> PolygonBlock {
    let h = 0.5 * side;
    PolygonBlock::new(vec![
        DVec2::new(h, -h),
        DVec2::new(h, h),
        DVec2::new(-h, h),
        DVec2::new(-h, -h),
    ])
}

/// Gives every block `hp`, turns the rest into armour and block 0 into the
/// cockpit with a generator and battery sized by its area.
pub fn outfit(structure: &mut BlockStructure, hp: i32) {
    for id in structure.block_ids() {
        let Some(block) = structure.block_mut(id) else {
            continue;
        };
        block.cockpit = false;
        if id == BlockId(0) {
            let rating = (0.5 * block.area() + 0.5).floor();
            block.hp = hp * 3;
            block.max_hp = hp * 3;
            block.colour = COCKPIT_COLOUR;
            block.cockpit = true;
            block.components.extend([
                Component::new(ComponentKind::Generator { production: rating }),
                Component::new(ComponentKind::Battery { storage: rating }),
                Component::new(ComponentKind::Cockpit),
            ]);
        } else {
            block.hp = hp * 3;
            block.max_hp = hp * 3;
            block.colour = ARMOUR_COLOUR;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::almost_equal;

    #[test]
    fn test_every_preset_builds() {
        let expected = [
            (ShipPreset::Small, 4, 3),
            (ShipPreset::Big, 7, 8),
            (ShipPreset::Bigger, 10, 13),
            (ShipPreset::Long, 13, 12),
            (ShipPreset::Wide, 16, 15),
            (ShipPreset::Octa, 29, 28),
            (ShipPreset::Single, 1, 0),
            (ShipPreset::SingleWeird, 1, 0),
        ];
        for (preset, blocks, connections) in expected {
            let s = preset.build(32.0, 1).unwrap();
            assert_eq!(s.len(), blocks, "{preset}");
            assert_eq!(s.connection_count(), connections, "{preset}");
            assert!(s.is_connected(), "{preset}");
            assert!(s.is_consistent(), "{preset}");
        }
    }

    #[test]
    fn test_quad_presets_area() {
        let s = ShipPreset::Wide.build(32.0, 1).unwrap();
        assert!(almost_equal(s.area(), 16.0 * 1024.0));
    }

    #[test]
    fn test_cockpit_outfit() {
        let s = ShipPreset::Single.build(32.0, 2).unwrap();
        let cockpit = s.block(BlockId(0)).unwrap();
        assert!(cockpit.cockpit);
        assert_eq!(cockpit.hp, 6);
        assert_eq!(cockpit.colour, COCKPIT_COLOUR);
        let generator = cockpit
            .components
            .iter()
            .find_map(|c| c.kind.power_production());
        assert_eq!(generator, Some(512.0));
        assert_eq!(cockpit.components.iter().filter(|c| c.kind.is_gun()).count(), 4);
    }

    #[test]
    fn test_armour_outfit() {
        let s = ShipPreset::Small.build(32.0, 1).unwrap();
        for (id, block) in s.blocks().filter(|(id, _)| *id != BlockId(0)) {
            assert!(!block.cockpit, "block {id}");
            assert_eq!(block.max_hp, 3);
            assert_eq!(block.colour, ARMOUR_COLOUR);
        }
    }

    #[test]
    fn test_preset_names_parse() {
        for preset in ShipPreset::ALL {
            assert_eq!(preset.name().parse::<ShipPreset>(), Ok(preset));
        }
        assert!("frigate".parse::<ShipPreset>().is_err());
    }

    #[test]
    fn test_quad_block_faces_forward() {
        let q = quad_block(32.0);
        let angles: Vec<f64> = q.edges().iter().map(|e| e.angle_degrees()).collect();
        assert_eq!(angles, vec![0.0, 90.0, 180.0, 270.0]);
    }
}
