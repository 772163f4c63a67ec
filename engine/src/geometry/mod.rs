//! Geometry module
//!
//! Pure 2D geometry used by the block-structure code: edges of convex
//! polygons, shoelace area/centroid, polygon moments of inertia and the
//! convex overlap tests used to reject illegal block placements.
//!
//! All coordinates are `f64` world units held in [`glam::DVec2`].
//!
//! # Submodules
//!
//! - [`angles`] - Degree helpers and tolerant float comparison
//! - [`edge`] - Directed polygon edge with outward-normal angle
//! - [`polygon`] - Area, centroid, moment and overlap tests for convex polygons

pub mod angles;
pub mod edge;
pub mod polygon;

pub use angles::{
    almost_equal, degrees_almost_equal, normalize_degrees, polar_degrees, rotate_degrees,
    unit_from_degrees,
};
pub use edge::{EDGE_LENGTH_EPSILON, EDGE_OVERLAP_EPSILON, Edge};
pub use polygon::{
    MIN_POLYGON_SIDES, closed_pairs, convex_polygons_overlap, inside_convex_polygon,
    is_convex_counter_clockwise, moment_for_polygon, polygon_area, polygon_centroid,
    polygon_signed_area, regular_polygon_vertices, regular_polygon_with_side,
    scale_about_centroid, segments_cross, square_vertices,
};
