//! Play field plausibility
//!
//! The four wall markers are accepted as a field when no two of them are
//! closer than a minimum separation and no three of them are (nearly) on one
//! line. Colinearity is measured as the sine of the corner angle, so the test
//! does not depend on how far the table is from the camera.

use glam::Vec3;

/// Why a wall layout was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefect {
    /// Two walls sit on top of each other
    Coincident { a: usize, b: usize, distance: f32 },
    /// Three walls lie on one line
    Colinear { corner: usize, sine: f32 },
}

/// Sine of the angle at `corner` between the edges towards `a` and `b`
fn corner_sine(corner: Vec3, a: Vec3, b: Vec3) -> f32 {
    let u = a - corner;
    let v = b - corner;
    let denom = u.length() * v.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    u.cross(v).length() / denom
}

/// Check that four corners form a non-degenerate quadrilateral
pub fn check_field(
    corners: &[Vec3; 4],
    min_separation: f32,
    min_corner_sine: f32,
) -> Result<(), FieldDefect> {
    for a in 0..4 {
        for b in (a + 1)..4 {
            let distance = corners[a].distance(corners[b]);
            if distance < min_separation || distance <= f32::EPSILON {
                return Err(FieldDefect::Coincident { a, b, distance });
            }
        }
    }

    // Every triple of the four corners, measured at its first corner
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    for (corner, a, b) in TRIPLES {
        let sine = corner_sine(corners[corner], corners[a], corners[b]);
        if sine < min_corner_sine {
            return Err(FieldDefect::Colinear { corner, sine });
        }
    }

    Ok(())
}

/// Area of the field polygon walked in boundary order
pub fn field_area(boundary: &[Vec3; 4]) -> f32 {
    let [a, b, c, d] = *boundary;
    0.5 * ((b - a).cross(c - a) + (c - a).cross(d - a)).length()
}
