use thiserror::Error;

/// Top-level error type for framing analysis.
#[derive(Debug, Error)]
pub enum FramesplitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised by geometric computations and the geometry kernel.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("intersection query failed: {0}")]
    IntersectionQueryFailed(String),

    #[error("projection failed: {0}")]
    ProjectionFailed(String),
}

/// Errors raised by the document that owns the members.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("axis curve unavailable: {0}")]
    CurveUnavailable(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("split failed: {0}")]
    SplitFailed(String),

    #[error("no transaction is open")]
    TransactionNotOpen,

    #[error("a transaction is already open")]
    TransactionAlreadyOpen,
}

/// Errors related to analysis operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`FramesplitError`].
pub type Result<T> = std::result::Result<T, FramesplitError>;
