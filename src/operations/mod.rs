pub mod hull;
pub mod sweep;
