//! Blocks Module
//!
//! A block is one convex polygon of a ship's hull. It keeps its authoring
//! shape untouched and places it with a rotation plus translation, so
//! repeated rotations never accumulate drift in the live vertices.
//!
//! # Submodules
//!
//! - [`polygon_block`] - The block itself: transform, edges, free-edge bookkeeping
//! - [`block_data`] - Persisted form of a block (YAML/JSON)

pub mod block_data;
pub mod polygon_block;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use block_data::{BlockData, default_colour};
pub use polygon_block::PolygonBlock;

/// Stable index of a block inside one `BlockStructure`. Never reused after
/// the block is removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
