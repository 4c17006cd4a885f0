mod event;
mod segment_intersections;

pub use segment_intersections::SegmentIntersections;
