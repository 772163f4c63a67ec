//! Angle helpers
//!
//! Angles in this crate are stored in degrees, the unit blocks are authored
//! in. Rotations by exact multiples of 90 degrees use exact unit vectors so
//! grid-aligned hulls stay on the grid.

use glam::DVec2;

/// Relative tolerance for [`almost_equal`].
pub const ALMOST_EQUAL_EPSILON: f64 = 1e-4;

/// Relative float comparison: `|x - y| <= eps * min(|x|, |y|)`.
pub fn almost_equal(x: f64, y: f64) -> bool {
    (x - y).abs() <= ALMOST_EQUAL_EPSILON * x.abs().min(y.abs())
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// True when two angles differ by at most `tolerance` degrees on the circle.
pub fn degrees_almost_equal(a: f64, b: f64, tolerance: f64) -> bool {
    let d = normalize_degrees(a - b);
    d.min(360.0 - d) <= tolerance
}

/// Unit vector pointing at `degrees`, exact for multiples of 90.
pub fn unit_from_degrees(degrees: f64) -> DVec2 {
    let wrapped = normalize_degrees(degrees);
    if wrapped.fract() == 0.0 && (wrapped as i64) % 90 == 0 {
        return match wrapped as i64 {
            0 => DVec2::X,
            90 => DVec2::Y,
            180 => DVec2::NEG_X,
            _ => DVec2::NEG_Y,
        };
    }
    DVec2::from_angle(wrapped.to_radians())
}

/// Rotates `v` counter-clockwise by `degrees` around the origin.
pub fn rotate_degrees(v: DVec2, degrees: f64) -> DVec2 {
    unit_from_degrees(degrees).rotate(v)
}

/// Vector of length `r` pointing at `degrees`.
pub fn polar_degrees(degrees: f64, r: f64) -> DVec2 {
    unit_from_degrees(degrees) * r
}
