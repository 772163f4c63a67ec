//! Structure persistence
//!
//! ```yaml
//! blocks:
//!   0: { vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]], hp: 3, max-hp: 3 }
//!   1: { vertices: [[16, -16], [48, -16], [48, 16], [16, 16]] }
//! connections:
//!   - [[0, 1], [1, 3]]
//! ```
//!
//! Loading replays the saved connections breadth-first from the lowest id,
//! attaching each block by its saved edge, then checks that the rebuilt
//! connection set is exactly the saved one. Block ids are preserved.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{AttachError, BlockStructure, Connection};
use crate::game::blocks::{BlockData, BlockId, PolygonBlock};
use crate::game::config::StructureConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("structure has no blocks")]
    EmptyStructure,
    #[error("block {0} has fewer than three vertices or no area")]
    DegenerateBlock(BlockId),
    #[error("connection refers to unknown block {0}")]
    UnknownBlock(BlockId),
    #[error("block {block} could not be re-attached: {source}")]
    Attach {
        block: BlockId,
        source: AttachError,
    },
    #[error(
        "rebuilt structure has {} connections, saved structure has {}",
        .actual.len(),
        .expected.len()
    )]
    ConnectionMismatch {
        expected: Vec<Connection>,
        actual: Vec<Connection>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureData {
    pub blocks: BTreeMap<BlockId, BlockData>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl StructureData {
    pub fn from_yaml_str(contents: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Saved connections with each pair ordered and the list sorted and
    /// deduplicated, the form [`BlockStructure::extract_connections`] returns.
    pub fn canonical_connections(&self) -> Vec<Connection> {
        let mut connections: Vec<Connection> = self
            .connections
            .iter()
            .map(|&(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        connections.sort();
        connections.dedup();
        connections
    }
}

impl BlockStructure {
    pub fn dump_data(&self) -> StructureData {
        StructureData {
            blocks: self
                .blocks
                .iter()
                .map(|(&id, block)| (id, BlockData::from(block)))
                .collect(),
            connections: self.extract_connections(),
        }
    }

    pub fn dump_string(&self) -> Result<String, serde_yaml::Error> {
        self.dump_data().to_yaml_string()
    }

    pub fn load_str(contents: &str, config: StructureConfig) -> Result<Self, LoadError> {
        Self::load_data(&StructureData::from_yaml_str(contents)?, config)
    }

    /// Rebuilds a structure from saved data.
    ///
    /// Blocks not reachable from the lowest id through the saved connections
    /// are registered where they were saved.
    pub fn load_data(data: &StructureData, config: StructureConfig) -> Result<Self, LoadError> {
        let mut pending: BTreeMap<BlockId, PolygonBlock> = data
            .blocks
            .iter()
            .map(|(&id, saved)| {
                saved
                    .to_block()
                    .map(|block| (id, block))
                    .ok_or(LoadError::DegenerateBlock(id))
            })
            .collect::<Result<_, _>>()?;

        let expected = data.canonical_connections();
        let mut neighbours: BTreeMap<BlockId, Vec<(usize, BlockId, usize)>> = BTreeMap::new();
        for &((a, ea), (b, eb)) in &expected {
            for id in [a, b] {
                if !pending.contains_key(&id) {
                    return Err(LoadError::UnknownBlock(id));
                }
            }
            neighbours.entry(a).or_default().push((ea, b, eb));
            neighbours.entry(b).or_default().push((eb, a, ea));
        }

        let (root, root_block) = pending.pop_first().ok_or(LoadError::EmptyStructure)?;
        let mut structure = Self::empty(config);
        structure.commit_block(root, root_block);

        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &(edge, other, other_edge) in neighbours.get(&current).into_iter().flatten() {
                let Some(mut block) = pending.remove(&other) else {
                    continue;
                };
                structure
                    .place_candidate((current, edge), &mut block, other_edge)
                    .map_err(|source| LoadError::Attach {
                        block: other,
                        source,
                    })?;
                structure.register_loaded(other, block)?;
                queue.push_back(other);
            }
        }

        for (id, block) in pending {
            debug!("Block {} is not connected to block {}; placing as saved", id, root);
            structure.register_loaded(id, block)?;
        }

        let actual = structure.extract_connections();
        if actual != expected {
            return Err(LoadError::ConnectionMismatch { expected, actual });
        }
        Ok(structure)
    }

    fn register_loaded(&mut self, id: BlockId, block: PolygonBlock) -> Result<(), LoadError> {
        if let Some(overlapped) = self.find_overlap(&block) {
            return Err(LoadError::Attach {
                block: id,
                source: AttachError::IllegalOverlap { overlapped },
            });
        }
        self.commit_block(id, block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BlockStructure {
        let mut s = BlockStructure::new(PolygonBlock::quad(32.0).with_hp(3));
        let right = s.attach((BlockId(0), 1), PolygonBlock::quad(32.0), 3).unwrap();
        s.attach((right, 2), PolygonBlock::regular(8, 32.0), 4).unwrap();
        s.attach((BlockId(0), 0), PolygonBlock::quad(32.0), 2).unwrap();
        s
    }

    #[test]
    fn test_round_trip_is_stable() {
        let s = sample();
        let first = s.dump_string().unwrap();
        let loaded = BlockStructure::load_str(&first, StructureConfig::default()).unwrap();
        assert_eq!(loaded.extract_connections(), s.extract_connections());
        assert_eq!(loaded.block_ids(), s.block_ids());
        assert_eq!(loaded.block(BlockId(0)).map(|b| b.hp), Some(3));
        let second = loaded.dump_string().unwrap();
        let again = BlockStructure::load_str(&second, StructureConfig::default()).unwrap();
        assert_eq!(again.extract_connections(), loaded.extract_connections());
        assert!(again.is_consistent());
    }

    #[test]
    fn test_load_keeps_sparse_ids() {
        let mut s = sample();
        s.remove_block(BlockId(3));
        let loaded = BlockStructure::load_data(&s.dump_data(), StructureConfig::default()).unwrap();
        assert_eq!(loaded.block_ids(), vec![BlockId(0), BlockId(1), BlockId(2)]);
        assert_eq!(loaded.next_id(), BlockId(3));
    }

    #[test]
    fn test_hand_written_yaml() {
        let yaml = r#"
blocks:
  0: { vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]], hp: 3, max-hp: 3, cockpit: true }
  1: { vertices: [[16, -16], [48, -16], [48, 16], [16, 16]] }
connections:
  - [[1, 3], [0, 1]]
"#;
        let s = BlockStructure::load_str(yaml, StructureConfig::default()).unwrap();
        assert_eq!(s.extract_connections(), vec![((BlockId(0), 1), (BlockId(1), 3))]);
        assert!(s.block(BlockId(0)).is_some_and(|b| b.cockpit));
    }

    #[test]
    fn test_clockwise_block_is_degenerate() {
        let yaml = r#"
blocks:
  0: { vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]] }
  1: { vertices: [[16, -16], [16, 16], [48, 16], [48, -16]] }
"#;
        let err = BlockStructure::load_str(yaml, StructureConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::DegenerateBlock(BlockId(1))));
    }

    #[test]
    fn test_saved_edges_of_different_length() {
        let yaml = r#"
blocks:
  0: { vertices: [[-16, -16], [16, -16], [16, 16], [-16, 16]] }
  1: { vertices: [[16, -32], [48, -32], [48, 32], [16, 32]] }
connections:
  - [[0, 1], [1, 3]]
"#;
        let err = BlockStructure::load_str(yaml, StructureConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Attach {
                block: BlockId(1),
                source: AttachError::EdgeMismatch { .. }
            }
        ));
    }

    #[test]
    fn test_missing_connection_is_mismatch() {
        let mut data = sample().dump_data();
        data.connections.pop();
        let err = BlockStructure::load_data(&data, StructureConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::ConnectionMismatch { .. }));
    }

    #[test]
    fn test_unknown_block_in_connections() {
        let mut data = sample().dump_data();
        data.connections.push(((BlockId(0), 2), (BlockId(99), 0)));
        let err = BlockStructure::load_data(&data, StructureConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownBlock(BlockId(99))));
    }

    #[test]
    fn test_empty_structure() {
        let data = StructureData {
            blocks: BTreeMap::new(),
            connections: Vec::new(),
        };
        let err = BlockStructure::load_data(&data, StructureConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyStructure));
    }

    #[test]
    fn test_json_encoding() {
        let s = sample();
        let json = serde_json::to_string(&s.dump_data()).unwrap();
        let data: StructureData = serde_json::from_str(&json).unwrap();
        let loaded = BlockStructure::load_data(&data, StructureConfig::default()).unwrap();
        assert_eq!(loaded.extract_connections(), s.extract_connections());
    }
}
