use crate::geometry::{Aabb, Circle, Polygon};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;

use super::sat;

/// Returns whether two circles overlap (touching counts).
#[must_use]
pub fn circles_intersect(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius() + b.radius();
    nalgebra::distance_squared(a.center(), b.center()) <= reach * reach
}

/// Returns whether two boxes overlap (touching counts).
#[must_use]
pub fn aabbs_intersect(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Returns whether a circle overlaps a box.
#[must_use]
pub fn circle_aabb_intersect(circle: &Circle, aabb: &Aabb) -> bool {
    let c = circle.center();
    let closest = Point2::new(
        c.x.clamp(aabb.min.x, aabb.max.x),
        c.y.clamp(aabb.min.y, aabb.max.y),
    );
    nalgebra::distance_squared(c, &closest) <= circle.radius() * circle.radius()
}

/// Returns whether a circle overlaps a convex polygon.
#[must_use]
pub fn circle_polygon_intersect(circle: &Circle, polygon: &Polygon) -> bool {
    if sat::point_in_polygon(circle.center(), polygon) {
        return true;
    }
    polygon
        .edges()
        .any(|(a, b)| point_to_segment_dist(circle.center(), a, b) <= circle.radius())
}

/// Returns whether two convex polygons overlap; see [`sat::polygons_intersect`].
#[must_use]
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    sat::polygons_intersect(a, b)
}
