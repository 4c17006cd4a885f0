pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

use std::cmp::Ordering;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance used by segment predicates (parallelism, parameter range).
pub const EPSILON: f64 = 1e-6;

/// Orders points lexicographically: by `x`, then by `y`.
///
/// Coordinates are assumed finite; `NaN` compares as equal.
#[must_use]
pub fn cmp_points(a: &Point2, b: &Point2) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed orientation of `p` relative to the directed line `a -> b`.
///
/// Positive when `p` is to the left in a y-up frame, negative to the right,
/// zero when collinear.
#[must_use]
pub fn orient(a: &Point2, b: &Point2, p: &Point2) -> f64 {
    cross(&(b - a), &(p - a))
}

/// Returns whether two points coincide within `tol` on both axes.
#[must_use]
pub fn points_eq(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
}

/// Returns whether both coordinates are finite.
#[must_use]
pub fn is_finite(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order() {
        let a = Point2::new(0.0, 5.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 2.0);
        assert_eq!(cmp_points(&a, &b), Ordering::Less);
        assert_eq!(cmp_points(&c, &b), Ordering::Greater);
        assert_eq!(cmp_points(&b, &b), Ordering::Equal);
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let a = Point2::new(-0.0, 1.0);
        let b = Point2::new(0.0, 0.0);
        assert_eq!(cmp_points(&a, &b), Ordering::Greater);
    }

    #[test]
    fn orientation_sign() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(orient(&a, &b, &Point2::new(0.5, 1.0)) > 0.0);
        assert!(orient(&a, &b, &Point2::new(0.5, -1.0)) < 0.0);
        assert!(orient(&a, &b, &Point2::new(2.0, 0.0)).abs() < TOLERANCE);
    }
}
