//! Collision shape descriptions handed to the physics backend.

use glam::DVec2;

/// Convex polygon in body-local coordinates, tagged with the id of the
/// block it was built from so collision reports can be traced back.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygonShape {
    pub vertices: Vec<DVec2>,
    pub tag: u64,
}

impl ConvexPolygonShape {
    pub fn new(vertices: Vec<DVec2>, tag: u64) -> Self {
        Self { vertices, tag }
    }
}
