use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::math::intersect_2d::{in_unit_range, line_line_intersect_2d, point_at};
use crate::math::{cmp_points, cross, points_eq, Point2, Vector2, EPSILON, TOLERANCE};

use super::Aabb;

/// A line segment with canonically ordered endpoints.
///
/// The lexicographically smaller endpoint is always stored first, so
/// `Segment::new(a, b) == Segment::new(b, a)` and both hash the same.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    start: Point2,
    end: Point2,
}

impl Segment {
    /// Creates a segment, reordering the endpoints if needed.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        if cmp_points(&a, &b) == Ordering::Greater {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// Creates a segment from raw coordinates.
    #[must_use]
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    /// The lexicographically smaller endpoint.
    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    /// The lexicographically larger endpoint.
    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Returns whether both endpoints coincide.
    #[must_use]
    pub fn is_point(&self) -> bool {
        points_eq(&self.start, &self.end, TOLERANCE)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.start, self.end)
    }

    /// The `y` of the supporting line at `x`.
    ///
    /// Vertical (and degenerate) segments report the `y` of `start`.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        let d = self.direction();
        if d.x.abs() < TOLERANCE {
            return self.start.y;
        }
        self.start.y + (x - self.start.x) * d.y / d.x
    }

    /// Slope `dy/dx`, infinite for vertical segments.
    #[must_use]
    pub fn slope(&self) -> f64 {
        let d = self.direction();
        if d.x.abs() < TOLERANCE {
            return f64::INFINITY;
        }
        d.y / d.x
    }

    /// Returns the single point where the two segments meet.
    ///
    /// `None` if the segments are parallel (collinear included), either one
    /// is degenerate, or the crossing of the supporting lines lies outside
    /// either segment.
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<Point2> {
        if self.is_point() || other.is_point() || self.is_parallel(other) {
            return None;
        }
        let d1 = self.direction();
        let d2 = other.direction();
        let (t, u) = line_line_intersect_2d(&self.start, &d1, &other.start, &d2, TOLERANCE)?;
        if !in_unit_range(t, EPSILON) || !in_unit_range(u, EPSILON) {
            return None;
        }
        Some(point_at(&self.start, &d1, t.clamp(0.0, 1.0)))
    }

    /// Returns whether the directions differ by an angle below [`EPSILON`].
    ///
    /// Degenerate segments have no direction and are never parallel.
    #[must_use]
    pub fn is_parallel(&self, other: &Segment) -> bool {
        let d1 = self.direction();
        let d2 = other.direction();
        let norms = d1.norm() * d2.norm();
        if norms < TOLERANCE {
            return false;
        }
        (cross(&d1, &d2) / norms).abs() < EPSILON
    }

    /// Returns whether `other` lies on the supporting line of `self`.
    #[must_use]
    pub fn is_collinear(&self, other: &Segment) -> bool {
        if !self.is_parallel(other) {
            return false;
        }
        let d = self.direction();
        let offset = other.start - self.start;
        (cross(&d, &offset) / d.norm()).abs() < EPSILON
    }

    /// The smallest segment covering two collinear, overlapping segments.
    ///
    /// Segments that merely touch at an endpoint overlap.
    #[must_use]
    pub fn union(&self, other: &Segment) -> Option<Segment> {
        if !self.is_collinear(other) {
            return None;
        }
        let overlapping = self.contains_point(&other.start)
            || self.contains_point(&other.end)
            || other.contains_point(&self.start)
            || other.contains_point(&self.end);
        if !overlapping {
            return None;
        }
        let mut ends = [self.start, self.end, other.start, other.end];
        ends.sort_by(cmp_points);
        Some(Segment::new(ends[0], ends[3]))
    }

    /// Returns whether `p` lies on the segment.
    ///
    /// The position of `p` is parametrized on whichever axis the segment
    /// spans; the other coordinate must agree within [`EPSILON`].
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        if self.is_point() {
            return points_eq(&self.start, p, EPSILON);
        }
        let d = self.direction();
        let t = if d.x.abs() < TOLERANCE {
            // vertical
            if (p.x - self.start.x).abs() > EPSILON {
                return false;
            }
            (p.y - self.start.y) / d.y
        } else if d.y.abs() < TOLERANCE {
            // horizontal
            if (p.y - self.start.y).abs() > EPSILON {
                return false;
            }
            (p.x - self.start.x) / d.x
        } else {
            let tx = (p.x - self.start.x) / d.x;
            let ty = (p.y - self.start.y) / d.y;
            if (tx - ty).abs() > EPSILON {
                return false;
            }
            tx
        };
        in_unit_range(t, EPSILON)
    }

    fn key(&self) -> [u64; 4] {
        [
            canonical_bits(self.start.x),
            canonical_bits(self.start.y),
            canonical_bits(self.end.x),
            canonical_bits(self.end.y),
        ]
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Intersection point of two segments; see [`Segment::intersection`].
#[must_use]
pub fn get_intersection(s1: &Segment, s2: &Segment) -> Option<Point2> {
    s1.intersection(s2)
}

/// See [`Segment::is_parallel`].
#[must_use]
pub fn parallel(s1: &Segment, s2: &Segment) -> bool {
    s1.is_parallel(s2)
}

/// See [`Segment::union`].
#[must_use]
pub fn union(s1: &Segment, s2: &Segment) -> Option<Segment> {
    s1.union(s2)
}

/// See [`Segment::contains_point`].
#[must_use]
pub fn contains_point(segment: &Segment, p: &Point2) -> bool {
    segment.contains_point(p)
}
