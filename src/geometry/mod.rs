mod aabb;
mod circle;
mod polygon;
pub mod segment;

pub use aabb::{Aabb, Quadrant};
pub use circle::Circle;
pub use polygon::Polygon;
pub use segment::Segment;
