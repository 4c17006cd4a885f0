use nalgebra::Rotation2;

use crate::collision::sat;
use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{signed_area_2d, vertex_centroid};
use crate::math::{is_finite, Point2, Vector2};

use super::{Aabb, Segment};

/// A closed convex polygon.
///
/// Vertices are expected to be wound clockwise on screen (y-down), which is
/// counter-clockwise in a y-up frame. Convexity and winding are not
/// validated; the collision predicates tolerate either winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its vertex loop.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 vertices are given or any
    /// coordinate is non-finite.
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            }
            .into());
        }
        if !vertices.iter().all(is_finite) {
            return Err(GeometryError::NonFinite("polygon").into());
        }
        Ok(Self { vertices })
    }

    /// Creates a polygon from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Polygon::new`].
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Axis-aligned rectangle with corners `(x, y)` and `(x + w, y + h)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is non-finite.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::from_coords(&[
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ])
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Directed edges `(v[i], v[i + 1])`, wrapping back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (&Point2, &Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// Edges as canonical [`Segment`]s.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.edges().map(|(a, b)| Segment::new(*a, *b))
    }

    /// Signed area; positive for the expected winding.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.vertices)
    }

    /// Average of the vertices.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        vertex_centroid(&self.vertices)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::new(self.vertices[0], self.vertices[0]);
        for v in &self.vertices[1..] {
            aabb.min.x = aabb.min.x.min(v.x);
            aabb.min.y = aabb.min.y.min(v.y);
            aabb.max.x = aabb.max.x.max(v.x);
            aabb.max.y = aabb.max.y.max(v.y);
        }
        aabb
    }

    /// Returns a copy shifted by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vector2) -> Self {
        self.map_vertices(|v| v + offset)
    }

    /// Returns a copy scaled by `factor` about the centroid.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        let c = self.centroid();
        self.map_vertices(|v| c + (v - c) * factor)
    }

    /// Returns a copy rotated by `angle` radians about the centroid.
    ///
    /// Positive angles turn counter-clockwise in a y-up frame (clockwise on
    /// a y-down screen).
    #[must_use]
    pub fn rotate(&self, angle: f64) -> Self {
        let c = self.centroid();
        let rot = Rotation2::new(angle);
        self.map_vertices(|v| c + rot * (v - c))
    }

    /// Returns whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        sat::point_in_polygon(p, self)
    }

    /// Separating-axis overlap test against another convex polygon.
    #[must_use]
    pub fn intersects(&self, other: &Polygon) -> bool {
        sat::polygons_intersect(self, other)
    }

    fn map_vertices(&self, f: impl Fn(Point2) -> Point2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn too_few_vertices() {
        let err = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(err.is_err());
        assert!(Polygon::from_coords(&[(0.0, 0.0), (1.0, f64::INFINITY), (2.0, 0.0)]).is_err());
    }

    #[test]
    fn translate_does_not_mutate() {
        let p = Polygon::rectangle(0.0, 0.0, 2.0, 2.0).unwrap();
        let q = p.translate(Vector2::new(3.0, -1.0));
        assert_eq!(p.vertices()[0], Point2::new(0.0, 0.0));
        assert_eq!(q.vertices()[0], Point2::new(3.0, -1.0));
        assert_eq!(q.vertex_count(), 4);
    }

    #[test]
    fn scale_about_centroid() {
        let p = Polygon::rectangle(0.0, 0.0, 2.0, 2.0).unwrap();
        let q = p.scale(2.0);
        assert_relative_eq!(q.centroid(), p.centroid(), epsilon = 1e-12);
        let b = q.bounding_box();
        assert_relative_eq!(b.min, Point2::new(-1.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(b.max, Point2::new(3.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = Polygon::rectangle(0.0, 0.0, 4.0, 2.0).unwrap();
        let q = p.rotate(FRAC_PI_2);
        let b = q.bounding_box();
        assert_relative_eq!(b.width(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(b.height(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(q.centroid(), Point2::new(2.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(q.signed_area(), p.signed_area(), epsilon = 1e-12);
    }

    #[test]
    fn edges_wrap_around() {
        let p = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
        let edges: Vec<_> = p.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(*edges[2].0, Point2::new(0.0, 1.0));
        assert_eq!(*edges[2].1, Point2::new(0.0, 0.0));
        assert_eq!(p.segments().count(), 3);
    }
}
