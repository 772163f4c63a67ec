//! Persisted block form.
//!
//! Stores live vertices rather than the authoring shape plus transform, so a
//! loaded block starts with an identity transform at the saved position.
//! Visual-only keys (`inner-vertices`, `sprite`, `sprite-scale`) are ignored.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::PolygonBlock;
use crate::game::components::Component;
use crate::geometry::{is_convex_counter_clockwise, polygon_area};

pub fn default_colour() -> [u8; 3] {
    [255, 255, 255]
}

fn default_hp() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockData {
    pub vertices: Vec<[f64; 2]>,
    #[serde(default = "default_hp")]
    pub hp: i32,
    #[serde(default = "default_hp")]
    pub max_hp: i32,
    #[serde(default)]
    pub cockpit: bool,
    #[serde(default = "default_colour")]
    pub colour: [u8; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl From<&PolygonBlock> for BlockData {
    fn from(block: &PolygonBlock) -> Self {
        Self {
            vertices: block.vertices().iter().map(|v| [v.x, v.y]).collect(),
            hp: block.hp,
            max_hp: block.max_hp,
            cockpit: block.cockpit,
            colour: block.colour,
            components: block
                .components
                .iter()
                .map(|c| c.placed(block))
                .collect(),
        }
    }
}

impl BlockData {
    /// Rebuilds the block; `None` when the outline has fewer than three
    /// vertices, non-finite coordinates or no area, or is not a convex
    /// counter-clockwise loop.
    pub fn to_block(&self) -> Option<PolygonBlock> {
        if self.vertices.len() < 3 || self.vertices.iter().flatten().any(|c| !c.is_finite()) {
            return None;
        }
        let vertices: Vec<DVec2> = self.vertices.iter().map(|&[x, y]| DVec2::new(x, y)).collect();
        if !is_convex_counter_clockwise(&vertices) || polygon_area(&vertices) <= f64::EPSILON {
            return None;
        }
        let mut block = PolygonBlock::new(vertices)
            .with_colour(self.colour)
            .with_hp(self.max_hp);
        block.hp = self.hp;
        block.cockpit = self.cockpit;
        block.components = self.components.clone();
        Some(block)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn load_file(path: &Path) -> Result<Self, crate::game::structure::LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{ComponentKind, with_engine};

    #[test]
    fn test_block_yaml_ignores_visual_keys() {
        let yaml = r#"
vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]]
inner-vertices: [[-12, -12], [12, -12], [12, 12], [-12, 12]]
sprite: { name: poly4.png }
sprite-scale: 1.0
hp: 3
max-hp: 5
cockpit: true
colour: [0, 255, 0]
"#;
        let data = BlockData::from_yaml_str(yaml).unwrap();
        let block = data.to_block().unwrap();
        assert_eq!(block.hp, 3);
        assert_eq!(block.max_hp, 5);
        assert!(block.cockpit);
        assert_eq!(block.colour, [0, 255, 0]);
        assert_eq!(block.area(), 1024.0);
    }

    #[test]
    fn test_degenerate_blocks_rejected() {
        let line = BlockData::from_yaml_str("vertices: [[0, 0], [1, 0], [2, 0]]").unwrap();
        assert!(line.to_block().is_none());
        let pair = BlockData::from_yaml_str("vertices: [[0, 0], [1, 0]]").unwrap();
        assert!(pair.to_block().is_none());
    }

    #[test]
    fn test_clockwise_and_concave_outlines_rejected() {
        let clockwise =
            BlockData::from_yaml_str("vertices: [[0, 0], [0, 1], [1, 1], [1, 0]]").unwrap();
        assert!(clockwise.to_block().is_none());
        let dart =
            BlockData::from_yaml_str("vertices: [[-1, -1], [0, 0], [1, -1], [0, 1]]").unwrap();
        assert!(dart.to_block().is_none());
        let square =
            BlockData::from_yaml_str("vertices: [[0, 0], [1, 0], [1, 1], [0, 1]]").unwrap();
        assert!(square.to_block().is_some());
    }

    #[test]
    fn test_saved_block_keeps_world_position_and_mounts() {
        let mut block = with_engine(PolygonBlock::quad(2.0), 1, 500.0, 50.0);
        block.rotate_degrees(90.0);
        block.translate(DVec2::new(3.0, 0.0));
        let data = BlockData::from(&block);
        let restored = data.to_block().unwrap();
        assert_eq!(restored.rotation_degrees(), 0.0);
        assert!((restored.centroid() - block.centroid()).length() < 1e-9);

        let mount = &restored.components[0];
        assert!(matches!(mount.kind, ComponentKind::Engine { .. }));
        // Edge 1 faced right before the quarter turn, up after it
        assert!((mount.position - DVec2::new(3.0, 1.0)).length() < 1e-9);
        assert!((mount.angle_degrees - 90.0).abs() < 1e-9);
    }
}
