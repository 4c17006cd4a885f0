use super::{cross, Point2, Vector2};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` unless
/// `|d1 x d2| < tolerance`.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
    tolerance: f64,
) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom.abs() < tolerance {
        return None;
    }
    let delta = p2 - p1;
    let t = cross(&delta, d2) / denom;
    let u = cross(&delta, d1) / denom;
    Some((t, u))
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}

/// Returns whether `t` lies in `[0, 1]` with `eps` slack on both ends.
#[must_use]
pub fn in_unit_range(t: f64, eps: f64) -> bool {
    t >= -eps && t <= 1.0 + eps
}
