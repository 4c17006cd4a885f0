use thiserror::Error;

/// Top-level error type for the planar collision toolkit.
#[derive(Debug, Error)]
pub enum PlanarError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while constructing geometric primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("circle radius {0} is negative")]
    NegativeRadius(f64),
}

/// Errors raised by batch operations (sweep, hull).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`PlanarError`].
pub type Result<T> = std::result::Result<T, PlanarError>;
