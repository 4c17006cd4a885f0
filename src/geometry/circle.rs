use crate::error::{GeometryError, Result};
use crate::math::{is_finite, Point2, Vector2};

use super::Aabb;

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is negative or any value is non-finite.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if !is_finite(&center) || !radius.is_finite() {
            return Err(GeometryError::NonFinite("circle").into());
        }
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius).into());
        }
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let r = Vector2::new(self.radius, self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    /// Returns whether `p` lies inside or on the circle.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        nalgebra::distance_squared(&self.center, p) <= self.radius * self.radius
    }

    /// Returns the circle shifted by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vector2) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }
}
