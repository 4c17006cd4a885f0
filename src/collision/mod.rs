pub mod narrow;
mod quadtree;
pub mod sat;

pub use quadtree::{Iter as QuadtreeIter, Quadtree, QuadtreeConfig};

use crate::geometry::{Aabb, Circle, Polygon, Segment};

/// Anything the broad phase can index: a current bounding box plus a
/// liveness flag.
///
/// The box is requested on demand and never cached by the index.
pub trait Collidable {
    /// Current axis-aligned bounds.
    fn bounding_box(&self) -> Aabb;

    /// Destroyed entities are ignored by insertion and queries.
    fn is_destroyed(&self) -> bool {
        false
    }
}

impl<T: Collidable + ?Sized> Collidable for &T {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn is_destroyed(&self) -> bool {
        (**self).is_destroyed()
    }
}

impl Collidable for Aabb {
    fn bounding_box(&self) -> Aabb {
        *self
    }
}

impl Collidable for Circle {
    fn bounding_box(&self) -> Aabb {
        Circle::bounding_box(self)
    }
}

impl Collidable for Polygon {
    fn bounding_box(&self) -> Aabb {
        Polygon::bounding_box(self)
    }
}

impl Collidable for Segment {
    fn bounding_box(&self) -> Aabb {
        Segment::bounding_box(self)
    }
}
