//! Structure Configuration
//!
//! Geometric tolerances used when blocks are attached to one another.

use serde::{Deserialize, Serialize};

use crate::geometry::EDGE_OVERLAP_EPSILON;

/// Tolerances for the attach algorithm.
///
/// `Default` returns the values the stock block set is tuned for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Scale applied to a candidate block (about its centroid) before the
    /// overlap test, so neighbours sharing an edge exactly are not rejected.
    pub overlap_shrink_factor: f64,
    /// Absolute endpoint distance under which two edges count as the same
    /// edge and get connected.
    pub edge_overlap_epsilon: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            overlap_shrink_factor: 0.99,
            edge_overlap_epsilon: EDGE_OVERLAP_EPSILON,
        }
    }
}
