//! Block Structure
//!
//! An arena of [`PolygonBlock`]s keyed by [`BlockId`], the global set of
//! free edges, and the symmetric connection graph between mated edges.
//! Blocks never hold references to each other; a connection is always
//! resolved through the owning structure.
//!
//! # Submodules
//!
//! - [`attach`] - Edge-mating placement, overlap guard and edge coincidence sweep
//! - [`connectivity`] - BFS over connections and fragment partitioning
//! - [`persistence`] - Saved structure format and connection-replay loading

pub mod attach;
pub mod connectivity;
pub mod persistence;

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;

use crate::game::blocks::{BlockId, PolygonBlock};
use crate::game::config::StructureConfig;
use crate::physics::ConvexPolygonShape;

pub use attach::AttachError;
pub use persistence::{LoadError, StructureData};

/// One edge of one block.
pub type EdgeRef = (BlockId, usize);

/// An unordered pair of mated edges, stored with the smaller end first.
pub type Connection = (EdgeRef, EdgeRef);

/// Structural changes for collaborators that mirror blocks (sprites,
/// debug overlays). Drained with [`BlockStructure::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructureEvent {
    Attached(BlockId),
    Removed(BlockId),
    /// Every block moved by `offset`.
    Recentered { offset: DVec2 },
}

#[derive(Debug, Clone)]
pub struct BlockStructure {
    blocks: BTreeMap<BlockId, PolygonBlock>,
    next_id: u64,
    free_edge_indices: BTreeSet<EdgeRef>,
    config: StructureConfig,
    events: Vec<StructureEvent>,
}

impl BlockStructure {
    /// Structure holding `root` as block 0.
    pub fn new(root: PolygonBlock) -> Self {
        Self::with_config(root, StructureConfig::default())
    }

    pub fn with_config(root: PolygonBlock, config: StructureConfig) -> Self {
        let mut structure = Self::empty(config);
        structure.commit_block(BlockId(0), root);
        structure
    }

    pub(crate) fn empty(config: StructureConfig) -> Self {
        Self {
            blocks: BTreeMap::new(),
            next_id: 0,
            free_edge_indices: BTreeSet::new(),
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lowest surviving id. Block 0 (the cockpit) while it exists.
    pub fn root(&self) -> Option<BlockId> {
        self.blocks.keys().next().copied()
    }

    pub fn any_block_index(&self) -> Option<BlockId> {
        self.root()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn block(&self, id: BlockId) -> Option<&PolygonBlock> {
        self.blocks.get(&id)
    }

    /// Mutable access for hit points, colour and components. Moving a single
    /// block here detaches it geometrically from its recorded connections.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut PolygonBlock> {
        self.blocks.get_mut(&id)
    }

    /// Blocks in ascending id order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &PolygonBlock)> + '_ {
        self.blocks.iter().map(|(&id, block)| (id, block))
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.keys().copied().collect()
    }

    /// Id the next attached block will get.
    pub fn next_id(&self) -> BlockId {
        BlockId(self.next_id)
    }

    pub fn free_edges(&self) -> &BTreeSet<EdgeRef> {
        &self.free_edge_indices
    }

    pub fn connection_count(&self) -> usize {
        self.blocks.values().map(|b| b.connections().len()).sum::<usize>() / 2
    }

    pub fn area(&self) -> f64 {
        self.blocks.values().map(PolygonBlock::area).sum()
    }

    /// Area-weighted centroid; the origin for a structure without area.
    pub fn centroid(&self) -> DVec2 {
        let area = self.area();
        if area <= 0.0 {
            return DVec2::ZERO;
        }
        self.blocks
            .values()
            .map(|b| b.centroid() * b.area())
            .sum::<DVec2>()
            / area
    }

    /// Shifts every block so the structure centroid sits on the origin and
    /// returns the old centroid.
    pub fn zero_centroid(&mut self) -> DVec2 {
        if self.area() <= 0.0 {
            return DVec2::ZERO;
        }
        let c = self.centroid();
        for block in self.blocks.values_mut() {
            block.translate(-c);
        }
        self.events.push(StructureEvent::Recentered { offset: -c });
        c
    }

    /// One collision shape per block, tagged with the block id.
    pub fn create_collision_shape(&self) -> Vec<ConvexPolygonShape> {
        self.blocks
            .iter()
            .map(|(&id, block)| block.create_collision_shape(id))
            .collect()
    }

    /// All connections as sorted `((a, ea), (b, eb))` pairs with the smaller
    /// edge reference first.
    pub fn extract_connections(&self) -> Vec<Connection> {
        let mut connections: Vec<Connection> = self
            .blocks
            .iter()
            .flat_map(|(&id, block)| {
                block
                    .connections()
                    .iter()
                    .map(move |(&edge, &other)| ((id, edge), other))
            })
            .filter(|(a, b)| a < b)
            .collect();
        connections.sort();
        connections
    }

    /// Deletes a block, returning its neighbours' mated edges to the free
    /// set. The returned block has all edges free again.
    pub fn remove_block(&mut self, id: BlockId) -> Option<PolygonBlock> {
        let mut block = self.blocks.remove(&id)?;
        self.release_neighbours(&block, |_| false);
        for edge in 0..block.edge_count() {
            self.free_edge_indices.remove(&(id, edge));
        }
        block.reset_edges();
        self.events.push(StructureEvent::Removed(id));
        Some(block)
    }

    /// Moves the blocks in `ids` into a new structure, renumbered densely
    /// from 0 in ascending order. Links between members survive; links to
    /// blocks left behind are freed on both sides.
    pub fn split_off(&mut self, ids: &BTreeSet<BlockId>) -> BlockStructure {
        let mapping: BTreeMap<BlockId, BlockId> = ids
            .iter()
            .filter(|id| self.blocks.contains_key(id))
            .enumerate()
            .map(|(i, &id)| (id, BlockId(i as u64)))
            .collect();

        let mut fragment = BlockStructure::empty(self.config.clone());
        for (&old, &new) in &mapping {
            let Some(mut block) = self.blocks.remove(&old) else {
                continue;
            };
            self.release_neighbours(&block, |other| mapping.contains_key(&other));
            for edge in 0..block.edge_count() {
                self.free_edge_indices.remove(&(old, edge));
            }
            block.remap_connections(&mapping);
            fragment.insert_linked(new, block);
            self.events.push(StructureEvent::Removed(old));
        }
        fragment
    }

    /// Takes the queued structural events.
    pub fn drain_events(&mut self) -> Vec<StructureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Checks the bookkeeping invariants: per-block free edges and
    /// connections partition the edge indices, connections are symmetric,
    /// and the global free set mirrors the per-block ones.
    pub fn is_consistent(&self) -> bool {
        let mut mirrored = BTreeSet::new();
        for (&id, block) in &self.blocks {
            let n = block.edge_count();
            let free = block.free_edge_indices();
            if free.iter().any(|&e| e >= n) {
                return false;
            }
            for (&edge, &(other, other_edge)) in block.connections() {
                if edge >= n || free.contains(&edge) {
                    return false;
                }
                let partner = self.blocks.get(&other).and_then(|o| o.connection(other_edge));
                if partner != Some((id, edge)) {
                    return false;
                }
            }
            if free.len() + block.connections().len() != n {
                return false;
            }
            mirrored.extend(free.iter().map(|&e| (id, e)));
        }
        let ids_below_next = self
            .blocks
            .keys()
            .next_back()
            .is_none_or(|id| id.0 < self.next_id);
        ids_below_next && mirrored == self.free_edge_indices
    }

    /// Frees the edges of `block`'s neighbours unless `keep(neighbour)`.
    fn release_neighbours(&mut self, block: &PolygonBlock, keep: impl Fn(BlockId) -> bool) {
        for &(other, other_edge) in block.connections().values() {
            if keep(other) {
                continue;
            }
            if let Some(neighbour) = self.blocks.get_mut(&other) {
                neighbour.disconnect_edge(other_edge);
                self.free_edge_indices.insert((other, other_edge));
            }
        }
    }

    /// Inserts a block that already carries its final connections.
    fn insert_linked(&mut self, id: BlockId, block: PolygonBlock) {
        self.free_edge_indices
            .extend(block.free_edge_indices().iter().map(|&e| (id, e)));
        self.blocks.insert(id, block);
        self.next_id = self.next_id.max(id.0 + 1);
        self.events.push(StructureEvent::Attached(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::almost_equal;

    fn chain(n: usize) -> BlockStructure {
        let mut s = BlockStructure::new(PolygonBlock::quad(1.0));
        let mut last = BlockId(0);
        for _ in 1..n {
            last = s.attach((last, 1), PolygonBlock::quad(1.0), 3).unwrap();
        }
        s
    }

    #[test]
    fn test_new_structure_has_root_zero() {
        let s = BlockStructure::new(PolygonBlock::quad(1.0));
        assert_eq!(s.root(), Some(BlockId(0)));
        assert_eq!(s.len(), 1);
        assert_eq!(s.free_edges().len(), 4);
        assert_eq!(s.next_id(), BlockId(1));
        assert!(s.is_consistent());
    }

    #[test]
    fn test_area_is_sum_of_blocks() {
        let s = chain(5);
        assert!(almost_equal(s.area(), 5.0));
        let summed: f64 = s.blocks().map(|(_, b)| b.area()).sum();
        assert!(almost_equal(s.area(), summed));
    }

    #[test]
    fn test_zero_centroid() {
        let mut s = chain(3);
        let c = s.zero_centroid();
        assert!((c - DVec2::new(1.0, 0.0)).length() < 1e-9);
        assert!(s.centroid().length() < 1e-9);
        let events = s.drain_events();
        assert!(matches!(
            events.last(),
            Some(StructureEvent::Recentered { .. })
        ));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_remove_frees_neighbour_edges() {
        let mut s = chain(3);
        let removed = s.remove_block(BlockId(1)).unwrap();
        assert_eq!(removed.free_edge_indices().len(), 4);
        assert!(s.free_edges().contains(&(BlockId(0), 1)));
        assert!(s.free_edges().contains(&(BlockId(2), 3)));
        assert!(!s.free_edges().iter().any(|(id, _)| *id == BlockId(1)));
        assert_eq!(s.connection_count(), 0);
        assert!(s.is_consistent());
        assert!(s.remove_block(BlockId(1)).is_none());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut s = chain(2);
        s.remove_block(BlockId(1));
        let id = s.attach((BlockId(0), 1), PolygonBlock::quad(1.0), 3).unwrap();
        assert_eq!(id, BlockId(2));
    }

    #[test]
    fn test_extract_connections_canonical() {
        let s = chain(3);
        assert_eq!(
            s.extract_connections(),
            vec![
                ((BlockId(0), 1), (BlockId(1), 3)),
                ((BlockId(1), 1), (BlockId(2), 3)),
            ]
        );
    }

    #[test]
    fn test_split_off_renumbers() {
        let mut s = chain(4);
        let members: BTreeSet<BlockId> = [BlockId(2), BlockId(3)].into_iter().collect();
        let fragment = s.split_off(&members);

        assert_eq!(s.len(), 2);
        assert!(s.free_edges().contains(&(BlockId(1), 1)));
        assert!(s.is_consistent());

        assert_eq!(fragment.block_ids(), vec![BlockId(0), BlockId(1)]);
        assert_eq!(
            fragment.extract_connections(),
            vec![((BlockId(0), 1), (BlockId(1), 3))]
        );
        assert!(fragment.free_edges().contains(&(BlockId(0), 3)));
        assert_eq!(fragment.next_id(), BlockId(2));
        assert!(fragment.is_consistent());
    }

    #[test]
    fn test_collision_shapes_tagged() {
        let s = chain(3);
        let tags: Vec<u64> = s.create_collision_shape().iter().map(|sh| sh.tag).collect();
        assert_eq!(tags, vec![0, 1, 2]);
    }
}
