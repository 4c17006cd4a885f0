use crate::geometry::Polygon;
use crate::math::polygon_2d::winding_sign;
use crate::math::{orient, Point2, TOLERANCE};

/// Returns whether some edge of `a` has every vertex of `b` strictly above it.
///
/// "Above" is the exterior side of the directed edge, derived from `a`'s own
/// winding, so either vertex order works. Collinear vertices count as
/// on-or-below. `true` means `a` contributes a separating axis.
#[must_use]
pub fn half_sat(a: &Polygon, b: &Polygon) -> bool {
    let exterior = exterior_sign(a);
    a.edges().any(|(p, q)| {
        b.vertices()
            .iter()
            .all(|v| orient(p, q, v) * exterior > TOLERANCE)
    })
}

/// Returns whether two convex polygons overlap (touching counts).
#[must_use]
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    !(half_sat(a, b) || half_sat(b, a))
}

/// Returns whether `p` lies inside or on the boundary of a convex polygon.
///
/// Inside means `p` is never strictly on both sides across the edges.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &Polygon) -> bool {
    let mut left = false;
    let mut right = false;
    for (a, b) in polygon.edges() {
        let o = orient(a, b, p);
        if o > TOLERANCE {
            left = true;
        } else if o < -TOLERANCE {
            right = true;
        }
        if left && right {
            return false;
        }
    }
    true
}

/// Sign of `orient` on the exterior side of `polygon`'s edges.
fn exterior_sign(polygon: &Polygon) -> f64 {
    // Interior lies to the left of each edge for positive area.
    if winding_sign(polygon.vertices()) < 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    fn diamond() -> Polygon {
        Polygon::from_coords(&[(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]).unwrap()
    }

    fn square_at(x: f64, y: f64) -> Polygon {
        Polygon::from_coords(&[(x, y), (x, y + 2.0), (x + 2.0, y + 2.0), (x + 2.0, y)]).unwrap()
    }

    #[test]
    fn diamond_overlaps_square_at_origin() {
        assert!(polygons_intersect(&diamond(), &square_at(0.0, 0.0)));
        assert!(polygons_intersect(&square_at(0.0, 0.0), &diamond()));
    }

    #[test]
    fn diamond_barely_overlaps_shifted_square() {
        let square = square_at(0.0, -1.0).translate(Vector2::new(0.9, 0.0));
        assert!(polygons_intersect(&diamond(), &square));
    }

    #[test]
    fn diamond_separated_from_distant_square() {
        assert!(!polygons_intersect(&diamond(), &square_at(2.0, 0.0)));
        assert!(!polygons_intersect(&diamond(), &square_at(1.5, 0.0)));
        assert!(half_sat(&diamond(), &square_at(2.0, 0.0)));
    }

    #[test]
    fn touching_edges_count_as_intersecting() {
        let a = Polygon::rectangle(0.0, 0.0, 1.0, 1.0).unwrap();
        let b = Polygon::rectangle(1.0, 0.0, 1.0, 1.0).unwrap();
        assert!(polygons_intersect(&a, &b));
    }

    #[test]
    fn result_ignores_winding() {
        let a = Polygon::rectangle(0.0, 0.0, 3.0, 3.0).unwrap();
        let mut rev = a.vertices().to_vec();
        rev.reverse();
        let a_rev = Polygon::new(rev).unwrap();
        let near = Polygon::rectangle(2.0, 2.0, 3.0, 3.0).unwrap();
        let far = Polygon::rectangle(5.0, 5.0, 1.0, 1.0).unwrap();
        assert!(polygons_intersect(&a, &near));
        assert!(polygons_intersect(&a_rev, &near));
        assert!(!polygons_intersect(&a, &far));
        assert!(!polygons_intersect(&a_rev, &far));
    }

    #[test]
    fn contained_polygon_intersects() {
        let outer = Polygon::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let inner = diamond().translate(Vector2::new(5.0, 5.0));
        assert!(polygons_intersect(&outer, &inner));
        assert!(polygons_intersect(&inner, &outer));
    }

    #[test]
    fn rotated_square_separation() {
        // Boxes overlap in both cases; only the rotated edges separate the second.
        let a = Polygon::rectangle(0.0, 0.0, 2.0, 2.0).unwrap();
        let b = Polygon::rectangle(0.0, 0.0, 2.0, 2.0)
            .unwrap()
            .rotate(std::f64::consts::FRAC_PI_4)
            .translate(Vector2::new(1.5, 1.5));
        assert!(polygons_intersect(&a, &b));
        let c = b.translate(Vector2::new(0.5, 0.5));
        assert!(a.bounding_box().intersects(&c.bounding_box()));
        assert!(!polygons_intersect(&a, &c));
    }

    #[test]
    fn point_containment() {
        let d = diamond();
        assert!(point_in_polygon(&Point2::new(0.0, 0.0), &d));
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &d));
        assert!(!point_in_polygon(&Point2::new(0.8, 0.8), &d));
        let mut rev = d.vertices().to_vec();
        rev.reverse();
        let d_rev = Polygon::new(rev).unwrap();
        assert!(point_in_polygon(&Point2::new(0.2, -0.3), &d_rev));
        assert!(!point_in_polygon(&Point2::new(2.0, 0.0), &d_rev));
    }
}
