use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise in a y-up frame, which is clockwise on
/// screen in a y-down frame.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `1.0` or `-1.0` for the winding of `points`, `0.0` when degenerate.
#[must_use]
pub fn winding_sign(points: &[Point2]) -> f64 {
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        0.0
    } else {
        area.signum()
    }
}

/// Arithmetic mean of the vertices.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vertex_centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let sum = points
        .iter()
        .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
    Point2::from(sum / points.len() as f64)
}
