//! Connectivity over the block connection graph.

use std::collections::{BTreeSet, VecDeque};

use super::BlockStructure;
use crate::game::blocks::BlockId;

impl BlockStructure {
    /// Blocks reachable from `id` through connections, `id` included.
    /// Empty when `id` is not in the structure.
    pub fn connectivity_set_of(&self, id: BlockId) -> BTreeSet<BlockId> {
        let mut reached = BTreeSet::new();
        if !self.blocks.contains_key(&id) {
            return reached;
        }
        reached.insert(id);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            let Some(block) = self.blocks.get(&current) else {
                continue;
            };
            for &(neighbour, _) in block.connections().values() {
                if self.blocks.contains_key(&neighbour) && reached.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        reached
    }

    /// Splits the structure into the blocks still joined to `anchor` and
    /// the disconnected fragments left over.
    ///
    /// Without an anchor (or with one that no longer exists) every block
    /// ends up in some fragment. Fragments are ordered by their lowest id.
    pub fn partition_from(
        &self,
        anchor: Option<BlockId>,
    ) -> (BTreeSet<BlockId>, Vec<BTreeSet<BlockId>>) {
        let survivors = anchor
            .map(|id| self.connectivity_set_of(id))
            .unwrap_or_default();

        let mut remaining: BTreeSet<BlockId> = self
            .blocks
            .keys()
            .filter(|id| !survivors.contains(id))
            .copied()
            .collect();
        let mut fragments = Vec::new();
        while let Some(seed) = remaining.pop_first() {
            let fragment = self.connectivity_set_of(seed);
            remaining.retain(|id| !fragment.contains(id));
            fragments.push(fragment);
        }
        (survivors, fragments)
    }

    /// Every connected component, ordered by lowest id.
    pub fn fragments(&self) -> Vec<BTreeSet<BlockId>> {
        self.partition_from(None).1
    }

    pub fn is_connected(&self) -> bool {
        self.fragments().len() <= 1
    }
}
