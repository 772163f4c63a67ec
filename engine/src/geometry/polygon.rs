//! Convex polygon helpers
//!
//! Shoelace area and centroid, polygon moment of inertia, and the overlap
//! tests `attach` uses to reject placements that would intersect existing
//! blocks. Vertex loops are implicitly closed: the last vertex connects back
//! to the first.
//!
//! # Overlap test
//!
//! Two convex polygons overlap when any vertex of one lies inside the other
//! or any pair of their edges crosses. Points exactly on a boundary are not
//! "inside"; callers that want to tolerate shared edges shrink one polygon
//! first with [`scale_about_centroid`].

use glam::DVec2;

/// Relative threshold below which two segments are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Iterator over `(v[i], v[i + 1])` pairs, wrapping around at the end.
pub fn closed_pairs(vertices: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    vertices
        .iter()
        .copied()
        .zip(vertices.iter().copied().cycle().skip(1))
}

/// Shoelace signed area; positive for counter-clockwise loops.
pub fn polygon_signed_area(vertices: &[DVec2]) -> f64 {
    0.5 * closed_pairs(vertices).map(|(p, q)| p.perp_dot(q)).sum::<f64>()
}

pub fn polygon_area(vertices: &[DVec2]) -> f64 {
    polygon_signed_area(vertices).abs()
}

/// First-moment centroid of the polygon's area.
///
/// Degenerate (zero-area) loops fall back to the vertex average.
pub fn polygon_centroid(vertices: &[DVec2]) -> DVec2 {
    if vertices.is_empty() {
        return DVec2::ZERO;
    }
    let signed_area = polygon_signed_area(vertices);
    if signed_area.abs() < 1e-12 {
        return vertices.iter().copied().sum::<DVec2>() / vertices.len() as f64;
    }
    let moment: DVec2 = closed_pairs(vertices)
        .map(|(p, q)| (p + q) * p.perp_dot(q))
        .sum();
    moment / (6.0 * signed_area)
}

/// Moment of inertia of a solid polygon of `mass` about the origin, with the
/// vertices first shifted by `offset`.
pub fn moment_for_polygon(mass: f64, vertices: &[DVec2], offset: DVec2) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (p, q) in closed_pairs(vertices) {
        let v1 = p + offset;
        let v2 = q + offset;
        let a = v2.perp_dot(v1);
        numerator += a * (v1.dot(v1) + v1.dot(v2) + v2.dot(v2));
        denominator += a;
    }
    if denominator.abs() < 1e-12 {
        return 0.0;
    }
    mass * numerator / (6.0 * denominator)
}

/// Strict interior test for a convex polygon of either winding.
pub fn inside_convex_polygon(point: DVec2, vertices: &[DVec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut positive = 0;
    let mut negative = 0;
    for (a, b) in closed_pairs(vertices) {
        let side = (b - a).perp_dot(point - a);
        let tolerance = 1e-9 * (b - a).length();
        if side > tolerance {
            positive += 1;
        } else if side < -tolerance {
            negative += 1;
        } else {
            return false;
        }
    }
    positive == 0 || negative == 0
}

/// Intersection point of segments `a0-a1` and `b0-b1`, endpoints included.
/// Parallel segments never cross.
pub fn segments_cross(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> Option<DVec2> {
    let r = a1 - a0;
    let s = b1 - b0;
    let rxs = r.perp_dot(s);
    if rxs.abs() <= PARALLEL_EPSILON * r.length() * s.length() {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.perp_dot(s) / rxs;
    let u = qp.perp_dot(r) / rxs;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a0 + r * t)
    } else {
        None
    }
}

pub fn convex_polygons_overlap(xs: &[DVec2], bs: &[DVec2]) -> bool {
    if xs.iter().any(|&p| inside_convex_polygon(p, bs)) {
        return true;
    }
    if bs.iter().any(|&p| inside_convex_polygon(p, xs)) {
        return true;
    }
    closed_pairs(xs).any(|(a0, a1)| {
        closed_pairs(bs).any(|(b0, b1)| segments_cross(a0, a1, b0, b1).is_some())
    })
}

/// True for a loop of at least three vertices that winds counter-clockwise
/// and never turns clockwise. Collinear vertices are allowed.
pub fn is_convex_counter_clockwise(vertices: &[DVec2]) -> bool {
    let n = vertices.len();
    if n < MIN_POLYGON_SIDES || polygon_signed_area(vertices) <= 0.0 {
        return false;
    }
    (0..n).all(|i| {
        let p = vertices[i];
        let q = vertices[(i + 1) % n];
        let r = vertices[(i + 2) % n];
        let (d0, d1) = (q - p, r - q);
        d0.perp_dot(d1) >= -1e-9 * d0.length() * d1.length()
    })
}

/// Copy of `vertices` scaled by `factor` about the polygon centroid.
pub fn scale_about_centroid(vertices: &[DVec2], factor: f64) -> Vec<DVec2> {
    let center = polygon_centroid(vertices);
    vertices
        .iter()
        .map(|&v| center + (v - center) * factor)
        .collect()
}

/// Counter-clockwise square of side `s` centred on the origin, starting at
/// the bottom-left corner.
pub fn square_vertices(s: f64) -> Vec<DVec2> {
    let h = 0.5 * s;
    vec![
        DVec2::new(-h, -h),
        DVec2::new(h, -h),
        DVec2::new(h, h),
        DVec2::new(-h, h),
    ]
}

/// Fewest sides a polygon block can have.
pub const MIN_POLYGON_SIDES: usize = 3;

/// Counter-clockwise regular `n`-gon of circumradius `r`. `n` below
/// [`MIN_POLYGON_SIDES`] yields a triangle.
///
/// Without a `start_angle` (radians) the first vertex sits half a step above
/// the x axis, so edge 0 faces along +x.
pub fn regular_polygon_vertices(n: usize, r: f64, start_angle: Option<f64>) -> Vec<DVec2> {
    let n = n.max(MIN_POLYGON_SIDES);
    let step = std::f64::consts::TAU / n as f64;
    let start = start_angle.unwrap_or(-0.5 * step);
    (0..n)
        .map(|i| DVec2::from_angle(start + i as f64 * step) * r)
        .collect()
}

/// Regular `n`-gon with edges of length `side`.
pub fn regular_polygon_with_side(n: usize, side: f64) -> Vec<DVec2> {
    let n = n.max(MIN_POLYGON_SIDES);
    let r = side / (2.0 * (std::f64::consts::PI / n as f64).sin());
    regular_polygon_vertices(n, r, None)
}
