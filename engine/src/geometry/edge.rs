//! Polygon edges
//!
//! An [`Edge`] is the directed segment between two consecutive vertices of
//! a counter-clockwise convex polygon. Edges are never stored on their own:
//! blocks rebuild them from their live vertices on demand.

use glam::DVec2;

use super::angles::{almost_equal, normalize_degrees};

/// Absolute endpoint tolerance for committing a structural connection.
pub const EDGE_OVERLAP_EPSILON: f64 = 1e-3;

/// Relative tolerance for comparing edge lengths.
pub const EDGE_LENGTH_EPSILON: f64 = 1e-4;

/// Directed segment `a -> b` of a polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: DVec2,
    pub b: DVec2,
}

impl Edge {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Direction of the outward normal in degrees, `[0, 360)`.
    ///
    /// The normal is the edge direction rotated by -90 degrees, which points
    /// out of the polygon when its vertices wind counter-clockwise.
    pub fn angle_degrees(&self) -> f64 {
        let d = self.b - self.a;
        normalize_degrees(f64::atan2(-d.x, d.y).to_degrees())
    }

    /// Unit outward normal.
    pub fn normal(&self) -> DVec2 {
        let d = self.b - self.a;
        DVec2::new(d.y, -d.x).normalize_or_zero()
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.a + self.b) * 0.5
    }

    /// Lengths agree within [`EDGE_LENGTH_EPSILON`] (relative).
    pub fn matches(&self, other: &Edge) -> bool {
        almost_equal(self.length(), other.length())
    }

    /// Endpoints coincide (in either orientation) within [`EDGE_OVERLAP_EPSILON`].
    pub fn overlaps(&self, other: &Edge) -> bool {
        self.overlaps_within(other, EDGE_OVERLAP_EPSILON)
    }

    /// Endpoints coincide (in either orientation) within `epsilon`.
    pub fn overlaps_within(&self, other: &Edge, epsilon: f64) -> bool {
        let close = |p: DVec2, q: DVec2| p.distance(q) <= epsilon;
        (close(self.a, other.a) && close(self.b, other.b))
            || (close(self.a, other.b) && close(self.b, other.a))
    }

    /// Coarse placement-preview test: both endpoints within `max_distance`
    /// of the other edge's endpoints, either orientation.
    ///
    /// Never used to commit structural state.
    pub fn almost_overlaps(&self, other: &Edge, max_distance: f64) -> bool {
        self.overlaps_within(other, max_distance)
    }

    /// The same segment walked the other way.
    pub fn reversed(&self) -> Edge {
        Edge::new(self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_normal_angles() {
        let bottom = Edge::new(DVec2::new(-1.0, -1.0), DVec2::new(1.0, -1.0));
        let right = Edge::new(DVec2::new(1.0, -1.0), DVec2::new(1.0, 1.0));
        let top = Edge::new(DVec2::new(1.0, 1.0), DVec2::new(-1.0, 1.0));
        let left = Edge::new(DVec2::new(-1.0, 1.0), DVec2::new(-1.0, -1.0));
        assert_eq!(bottom.angle_degrees(), 270.0);
        assert_eq!(right.angle_degrees(), 0.0);
        assert_eq!(top.angle_degrees(), 90.0);
        assert_eq!(left.angle_degrees(), 180.0);
        assert_eq!(right.normal(), DVec2::X);
    }

    #[test]
    fn test_length_and_midpoint() {
        let e = Edge::new(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0));
        assert_eq!(e.length(), 5.0);
        assert_eq!(e.midpoint(), DVec2::new(1.5, 2.0));
    }

    #[test]
    fn test_matches_uses_relative_tolerance() {
        let a = Edge::new(DVec2::ZERO, DVec2::new(32.0, 0.0));
        let b = Edge::new(DVec2::ZERO, DVec2::new(0.0, 32.001));
        let c = Edge::new(DVec2::ZERO, DVec2::new(0.0, 33.0));
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_overlaps_either_orientation() {
        let a = Edge::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));
        assert!(a.overlaps(&a));
        assert!(a.overlaps(&a.reversed()));
        let nudged = Edge::new(DVec2::new(0.0005, 0.0), DVec2::new(1.0, 0.0004));
        assert!(a.overlaps(&nudged));
        let shifted = Edge::new(DVec2::new(0.01, 0.0), DVec2::new(1.01, 0.0));
        assert!(!a.overlaps(&shifted));
        assert!(a.almost_overlaps(&shifted, 0.1));
    }
}
