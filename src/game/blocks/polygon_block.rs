//! Polygon Block
//!
//! Live vertices are always recomputed from `original_vertices`,
//! `rotation_degrees` and `translation`. Rotation pivots on the structure
//! origin, so it also carries the translation around.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;

use super::BlockId;
use crate::game::components::Component;
use crate::geometry::{
    Edge, closed_pairs, normalize_degrees, polygon_area, polygon_centroid, regular_polygon_with_side,
    rotate_degrees, square_vertices,
};
use crate::physics::ConvexPolygonShape;

/// One convex hull block.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonBlock {
    original_vertices: Vec<DVec2>,
    rotation_degrees: f64,
    translation: DVec2,
    free_edge_indices: BTreeSet<usize>,
    connections: BTreeMap<usize, (BlockId, usize)>,
    pub hp: i32,
    pub max_hp: i32,
    pub cockpit: bool,
    pub colour: [u8; 3],
    pub components: Vec<Component>,
}

impl PolygonBlock {
    /// Block over a convex, counter-clockwise vertex loop.
    pub fn new(vertices: Vec<DVec2>) -> Self {
        let free_edge_indices = (0..vertices.len()).collect();
        Self {
            original_vertices: vertices,
            rotation_degrees: 0.0,
            translation: DVec2::ZERO,
            free_edge_indices,
            connections: BTreeMap::new(),
            hp: 1,
            max_hp: 1,
            cockpit: false,
            colour: super::default_colour(),
            components: Vec::new(),
        }
    }

    /// Axis-aligned square centered on the origin. Edges face down, right,
    /// up and left, in that order.
    pub fn quad(side: f64) -> Self {
        Self::new(square_vertices(side))
    }

    /// Regular `n`-gon centered on the origin with edge 0 facing +x. Fewer
    /// than three sides gives a triangle.
    pub fn regular(n: usize, side: f64) -> Self {
        Self::new(regular_polygon_with_side(n, side))
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    pub fn with_colour(mut self, colour: [u8; 3]) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn original_vertices(&self) -> &[DVec2] {
        &self.original_vertices
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn translation(&self) -> DVec2 {
        self.translation
    }

    /// Maps a point from the authoring frame into the structure frame.
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        rotate_degrees(p, self.rotation_degrees) + self.translation
    }

    pub fn vertices(&self) -> Vec<DVec2> {
        self.original_vertices
            .iter()
            .map(|&v| self.transform_point(v))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.original_vertices.len()
    }

    pub fn edges(&self) -> Vec<Edge> {
        let vertices = self.vertices();
        closed_pairs(&vertices).map(|(a, b)| Edge::new(a, b)).collect()
    }

    pub fn edge(&self, index: usize) -> Option<Edge> {
        let n = self.edge_count();
        if index >= n {
            return None;
        }
        let a = self.transform_point(self.original_vertices[index]);
        let b = self.transform_point(self.original_vertices[(index + 1) % n]);
        Some(Edge::new(a, b))
    }

    /// Edge `index` in the untransformed authoring frame.
    pub fn authoring_edge(&self, index: usize) -> Option<Edge> {
        let n = self.edge_count();
        if index >= n {
            return None;
        }
        Some(Edge::new(
            self.original_vertices[index],
            self.original_vertices[(index + 1) % n],
        ))
    }

    /// Rotates the block about the structure origin.
    pub fn rotate_degrees(&mut self, delta: f64) -> &mut Self {
        self.rotation_degrees = normalize_degrees(self.rotation_degrees + delta);
        self.translation = rotate_degrees(self.translation, delta);
        self
    }

    pub fn translate(&mut self, offset: DVec2) -> &mut Self {
        self.translation += offset;
        self
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices())
    }

    pub fn centroid(&self) -> DVec2 {
        polygon_centroid(&self.vertices())
    }

    /// Alias of [`centroid`](Self::centroid), the point sprites are drawn at.
    pub fn position(&self) -> DVec2 {
        self.centroid()
    }

    pub fn free_edge_indices(&self) -> &BTreeSet<usize> {
        &self.free_edge_indices
    }

    pub fn is_edge_free(&self, index: usize) -> bool {
        self.free_edge_indices.contains(&index)
    }

    pub fn connections(&self) -> &BTreeMap<usize, (BlockId, usize)> {
        &self.connections
    }

    pub fn connection(&self, edge: usize) -> Option<(BlockId, usize)> {
        self.connections.get(&edge).copied()
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    /// Shape handed to the physics backend, tagged with the block id.
    pub fn create_collision_shape(&self, id: BlockId) -> ConvexPolygonShape {
        ConvexPolygonShape::new(self.vertices(), id.0)
    }

    /// Marks every edge free and forgets all partners.
    pub(crate) fn reset_edges(&mut self) {
        self.free_edge_indices = (0..self.edge_count()).collect();
        self.connections.clear();
    }

    pub(crate) fn connect_edge(&mut self, edge: usize, other: BlockId, other_edge: usize) {
        self.free_edge_indices.remove(&edge);
        self.connections.insert(edge, (other, other_edge));
    }

    pub(crate) fn disconnect_edge(&mut self, edge: usize) -> Option<(BlockId, usize)> {
        let partner = self.connections.remove(&edge);
        if edge < self.edge_count() {
            self.free_edge_indices.insert(edge);
        }
        partner
    }

    /// Rewrites partner ids through `map`, dropping links to ids it lacks.
    pub(crate) fn remap_connections(&mut self, map: &BTreeMap<BlockId, BlockId>) {
        let old = std::mem::take(&mut self.connections);
        for (edge, (other, other_edge)) in old {
            match map.get(&other) {
                Some(&renamed) => {
                    self.connections.insert(edge, (renamed, other_edge));
                }
                None => {
                    self.free_edge_indices.insert(edge);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::almost_equal;

    #[test]
    fn test_quad_block_edges() {
        for side in [1.0, 2.0, 32.0] {
            let q = PolygonBlock::quad(side);
            assert_eq!(q.edge_count(), 4);
            assert!(q.edges().iter().all(|e| almost_equal(e.length(), side)));
            let angles: Vec<f64> = q.edges().iter().map(Edge::angle_degrees).collect();
            assert_eq!(angles, vec![270.0, 0.0, 90.0, 180.0]);
            assert!(almost_equal(q.area(), side * side));
        }
    }

    #[test]
    fn test_rotation_keeps_shape_and_turns_normals() {
        let mut q = PolygonBlock::quad(1.0);
        for _ in 0..36 {
            q.rotate_degrees(10.0);
        }
        assert!(q.rotation_degrees().abs() < 1e-9 || (q.rotation_degrees() - 360.0).abs() < 1e-9);
        let first = q.original_vertices()[0];
        assert!((q.vertices()[0] - first).length() < 1e-9);

        let mut q = PolygonBlock::quad(1.0);
        q.rotate_degrees(90.0);
        let angle = q.edge(0).map(|e| e.angle_degrees()).unwrap_or(f64::NAN);
        assert!((angle - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_pivots_on_origin() {
        let mut q = PolygonBlock::quad(1.0);
        q.translate(DVec2::new(2.0, 0.0));
        q.rotate_degrees(90.0);
        let c = q.centroid();
        assert!((c - DVec2::new(0.0, 2.0)).length() < 1e-9);
    }

    #[test]
    fn test_edge_out_of_range() {
        let q = PolygonBlock::quad(1.0);
        assert!(q.edge(4).is_none());
        assert!(q.edge(3).is_some());
    }

    #[test]
    fn test_regular_block_has_at_least_three_edges() {
        let block = PolygonBlock::regular(2, 1.0);
        assert_eq!(block.edge_count(), 3);
        assert!(block.area() > 0.0);
        assert!(block.edges().iter().all(|e| almost_equal(e.length(), 1.0)));
    }

    #[test]
    fn test_regular_polygon_block() {
        let octa = PolygonBlock::regular(8, 32.0);
        assert_eq!(octa.edge_count(), 8);
        assert!(octa.edges().iter().all(|e| almost_equal(e.length(), 32.0)));
        let first = octa.edge(0).map(|e| e.angle_degrees()).unwrap_or(f64::NAN);
        assert!(first.abs() < 1e-6 || (first - 360.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_bookkeeping() {
        let mut q = PolygonBlock::quad(1.0);
        q.connect_edge(1, BlockId(7), 3);
        assert!(!q.is_edge_free(1));
        assert_eq!(q.connection(1), Some((BlockId(7), 3)));
        assert_eq!(q.disconnect_edge(1), Some((BlockId(7), 3)));
        assert!(q.is_edge_free(1));
        q.connect_edge(2, BlockId(1), 0);
        q.reset_edges();
        assert_eq!(q.free_edge_indices().len(), 4);
        assert!(q.connections().is_empty());
    }

    #[test]
    fn test_collision_shape_tagged_with_id() {
        let mut q = PolygonBlock::quad(2.0);
        q.translate(DVec2::new(5.0, 0.0));
        let shape = q.create_collision_shape(BlockId(3));
        assert_eq!(shape.tag, 3);
        assert_eq!(shape.vertices, q.vertices());
    }
}
