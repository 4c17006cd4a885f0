use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::{cmp_points, is_finite, orient, points_eq, Point2, TOLERANCE};

/// Computes the convex hull of a point set by recursive farthest-point
/// splitting.
///
/// The result starts at the lexicographically smallest point, follows the
/// chain above the baseline to the largest point, and returns along the
/// chain below it. Points lying on a hull edge are left out.
pub struct ConvexHull {
    points: Vec<Point2>,
}

impl ConvexHull {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Executes the construction.
    ///
    /// Inputs of at most 3 points are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if any coordinate is
    /// non-finite.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        if let Some(i) = self.points.iter().position(|p| !is_finite(p)) {
            return Err(
                OperationError::InvalidInput(format!("point {i} has a non-finite coordinate"))
                    .into(),
            );
        }
        if self.points.len() <= 3 {
            return Ok(self.points.clone());
        }

        let mut sorted = self.points.clone();
        sorted.sort_by(cmp_points);
        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        if points_eq(&first, &last, TOLERANCE) {
            return Ok(vec![first]);
        }

        let inner = &sorted[1..sorted.len() - 1];
        let above: Vec<Point2> = inner
            .iter()
            .filter(|p| orient(&first, &last, p) > TOLERANCE)
            .copied()
            .collect();
        let below: Vec<Point2> = inner
            .iter()
            .filter(|p| orient(&first, &last, p) < -TOLERANCE)
            .copied()
            .collect();

        let mut hull = vec![first];
        hull_side(&first, &last, &above, &mut hull);
        hull.push(last);
        hull_side(&last, &first, &below, &mut hull);

        debug!(input = self.points.len(), hull = hull.len(), "convex hull");
        Ok(hull)
    }
}

/// Appends the hull vertices strictly left of `a -> b`, in order from `a`
/// to `b`. Every point in `candidates` is already left of the line.
fn hull_side(a: &Point2, b: &Point2, candidates: &[Point2], out: &mut Vec<Point2>) {
    let Some(far) = candidates
        .iter()
        .map(|p| (*p, orient(a, b, p)))
        .filter(|(_, d)| *d > TOLERANCE)
        .max_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(p, _)| p)
    else {
        return;
    };

    let left_of = |from: &Point2, to: &Point2| -> Vec<Point2> {
        candidates
            .iter()
            .filter(|p| orient(from, to, p) > TOLERANCE)
            .copied()
            .collect()
    };
    let before = left_of(a, &far);
    let after = left_of(&far, b);

    hull_side(a, &far, &before, out);
    out.push(far);
    hull_side(&far, b, &after, out);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use spade::{DelaunayTriangulation, Point2 as SpadePoint2, Triangulation};

    use super::*;
    use crate::error::PlanarError;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn sorted(mut points: Vec<Point2>) -> Vec<Point2> {
        points.sort_by(cmp_points);
        points
    }

    #[test]
    fn unit_square_with_centroid() {
        let points = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.5, 0.5)];
        let hull = ConvexHull::new(points).execute().unwrap();
        assert_eq!(hull.len(), 4);
        assert_eq!(
            sorted(hull.clone()),
            vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0), p(1.0, 1.0)]
        );
        // Leftmost, upper chain, rightmost, lower chain.
        assert_eq!(hull, vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]);
    }

    #[test]
    fn small_inputs_unchanged() {
        let three = vec![p(3.0, 1.0), p(0.0, 0.0), p(1.0, 5.0)];
        assert_eq!(ConvexHull::new(three.clone()).execute().unwrap(), three);
        assert!(ConvexHull::new(Vec::new()).execute().unwrap().is_empty());
        let one = vec![p(2.0, 2.0)];
        assert_eq!(ConvexHull::new(one.clone()).execute().unwrap(), one);
    }

    #[test]
    fn collinear_edge_points_excluded() {
        let points = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 2.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ];
        let hull = ConvexHull::new(points).execute().unwrap();
        assert_eq!(
            sorted(hull),
            vec![p(0.0, 0.0), p(0.0, 2.0), p(2.0, 0.0), p(2.0, 2.0)]
        );
    }

    #[test]
    fn all_points_collinear() {
        let points = vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)];
        let hull = ConvexHull::new(points).execute().unwrap();
        assert_eq!(hull, vec![p(0.0, 0.0), p(3.0, 3.0)]);
    }

    #[test]
    fn matches_delaunay_hull() {
        for seed in 0..10 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let points: Vec<Point2> = (0..200)
                .map(|_| p(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)))
                .collect();

            let mut dt: DelaunayTriangulation<SpadePoint2<f64>> = DelaunayTriangulation::new();
            for q in &points {
                dt.insert(SpadePoint2::new(q.x, q.y)).unwrap();
            }
            let expected: Vec<Point2> = dt
                .convex_hull()
                .map(|edge| {
                    let pos = edge.from().position();
                    p(pos.x, pos.y)
                })
                .collect();

            let hull = ConvexHull::new(points).execute().unwrap();
            let (hull, expected) = (sorted(hull), sorted(expected));
            assert_eq!(hull.len(), expected.len(), "seed {seed}");
            for (a, b) in hull.iter().zip(&expected) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn hull_is_convex_and_encloses_input() {
        let mut rng = Pcg64::seed_from_u64(3);
        let points: Vec<Point2> = (0..100)
            .map(|_| p(rng.random_range(0.0..10.0), rng.random_range(0.0..10.0)))
            .collect();
        let hull = ConvexHull::new(points.clone()).execute().unwrap();
        let n = hull.len();
        for i in 0..n {
            let (a, b) = (hull[i], hull[(i + 1) % n]);
            // Clockwise in a y-up frame: every input point is on or right of each edge.
            for q in &points {
                assert!(orient(&a, &b, q) <= TOLERANCE);
            }
        }
    }

    #[test]
    fn non_finite_rejected() {
        let points = vec![p(0.0, 0.0), p(1.0, 0.0), p(f64::INFINITY, 1.0), p(0.0, 1.0)];
        let err = ConvexHull::new(points).execute().unwrap_err();
        assert!(matches!(err, PlanarError::Operation(OperationError::InvalidInput(_))));
    }
}
