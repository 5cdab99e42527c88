use thiserror::Error;

/// Top-level error type for the polycarve kernel.
#[derive(Debug, Error)]
pub enum PolycarveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
///
/// Geometric *degeneracy* (collinear points, zero-volume results, a clip
/// emptying the solid) is not an error; it yields an empty polyhedron
/// or a rejected edit. These variants cover genuinely malformed values.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to topological access.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`PolycarveError`].
pub type Result<T> = std::result::Result<T, PolycarveError>;
