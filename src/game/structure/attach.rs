//! Attach
//!
//! Placing a new block against a free edge of an existing one:
//!
//! 0. Reject the pair unless both edges have the same length.
//! 1. Rotate the candidate so its mating edge faces the target edge
//!    (normals 180 degrees apart).
//! 2. Translate it so its mating edge starts where the target edge ends.
//! 3. Reject it if a slightly shrunk copy overlaps any existing block.
//! 4. Register it under a fresh id and connect every edge of it that now
//!    coincides with a free edge of the structure. Closing a loop forms
//!    more than one connection in a single attach.

use thiserror::Error;
use tracing::debug;

use super::{BlockStructure, EdgeRef, StructureEvent};
use crate::game::blocks::{BlockId, PolygonBlock};
use crate::geometry::{convex_polygons_overlap, scale_about_centroid};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttachError {
    #[error("no block {0} in structure")]
    NoSuchBlock(BlockId),
    #[error("block {block} has no edge {edge}")]
    NoSuchEdge { block: BlockId, edge: usize },
    #[error("candidate block has no edge {0}")]
    NoSuchCandidateEdge(usize),
    #[error("edge of length {candidate} cannot mate with edge of length {target}")]
    EdgeMismatch { target: f64, candidate: f64 },
    #[error("candidate block overlaps block {overlapped}")]
    IllegalOverlap { overlapped: BlockId },
}

impl BlockStructure {
    /// Attaches `block` by its edge `edge` to the edge `target` of an
    /// existing block and returns the new block's id.
    ///
    /// On error the structure is unchanged. The candidate is consumed either
    /// way.
    pub fn attach(
        &mut self,
        target: EdgeRef,
        mut block: PolygonBlock,
        edge: usize,
    ) -> Result<BlockId, AttachError> {
        self.place_candidate(target, &mut block, edge)?;
        if let Some(overlapped) = self.find_overlap(&block) {
            debug!(
                "Rejected block on {}:{}: overlaps block {}",
                target.0, target.1, overlapped
            );
            return Err(AttachError::IllegalOverlap { overlapped });
        }
        let id = BlockId(self.next_id);
        let connected = self.commit_block(id, block);
        debug!(
            "Attached block {} to {}:{} ({} connections)",
            id, target.0, target.1, connected
        );
        Ok(id)
    }

    /// Rotates and translates `block` into mating position against
    /// `target` without registering it. Edges of different length never
    /// mate, so such a pair is rejected before the block is moved.
    pub fn place_candidate(
        &self,
        (target_id, target_edge): EdgeRef,
        block: &mut PolygonBlock,
        edge: usize,
    ) -> Result<(), AttachError> {
        let target = self
            .blocks
            .get(&target_id)
            .ok_or(AttachError::NoSuchBlock(target_id))?
            .edge(target_edge)
            .ok_or(AttachError::NoSuchEdge {
                block: target_id,
                edge: target_edge,
            })?;
        let own = block
            .edge(edge)
            .ok_or(AttachError::NoSuchCandidateEdge(edge))?;
        if !target.matches(&own) {
            return Err(AttachError::EdgeMismatch {
                target: target.length(),
                candidate: own.length(),
            });
        }

        block.rotate_degrees(target.angle_degrees() + 180.0 - own.angle_degrees());
        let own = block
            .edge(edge)
            .ok_or(AttachError::NoSuchCandidateEdge(edge))?;
        block.translate(target.b - own.a);
        Ok(())
    }

    /// First existing block whose outline overlaps the shrunk outline of
    /// `block`.
    pub fn find_overlap(&self, block: &PolygonBlock) -> Option<BlockId> {
        let shrunk = scale_about_centroid(&block.vertices(), self.config.overlap_shrink_factor);
        self.blocks
            .iter()
            .find(|(_, other)| convex_polygons_overlap(&shrunk, &other.vertices()))
            .map(|(&id, _)| id)
    }

    /// Registers a placed block under `id` with all edges free, then
    /// connects its coincident edges. Returns the number of connections
    /// formed.
    pub(crate) fn commit_block(&mut self, id: BlockId, mut block: PolygonBlock) -> usize {
        block.reset_edges();
        let edge_count = block.edge_count();
        self.blocks.insert(id, block);
        self.next_id = self.next_id.max(id.0 + 1);
        self.free_edge_indices
            .extend((0..edge_count).map(|edge| (id, edge)));
        self.events.push(StructureEvent::Attached(id));
        self.connect_coincident_edges(id)
    }

    /// Coincidence sweep: pairs each free edge of `id` with at most one
    /// coinciding free edge of another block.
    fn connect_coincident_edges(&mut self, id: BlockId) -> usize {
        let Some(block) = self.blocks.get(&id) else {
            return 0;
        };
        let epsilon = self.config.edge_overlap_epsilon;
        let new_edges = block.edges();

        let mut matches: Vec<(usize, EdgeRef)> = Vec::new();
        for (new_edge, segment) in new_edges.iter().enumerate() {
            let found = self.free_edge_indices.iter().find(|&&(other, other_edge)| {
                other != id
                    && !matches.iter().any(|(_, claimed)| *claimed == (other, other_edge))
                    && self
                        .blocks
                        .get(&other)
                        .and_then(|b| b.edge(other_edge))
                        .is_some_and(|e| e.overlaps_within(segment, epsilon))
            });
            if let Some(&other) = found {
                matches.push((new_edge, other));
            }
        }

        for &(new_edge, (other, other_edge)) in &matches {
            self.free_edge_indices.remove(&(id, new_edge));
            self.free_edge_indices.remove(&(other, other_edge));
            if let Some(b) = self.blocks.get_mut(&id) {
                b.connect_edge(new_edge, other, other_edge);
            }
            if let Some(b) = self.blocks.get_mut(&other) {
                b.connect_edge(other_edge, id, new_edge);
            }
        }
        matches.len()
    }
}
