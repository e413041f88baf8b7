use thiserror::Error;

// Unified error type for bcrs-assembly

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("overflow pool exhausted while inserting into row {row} (capacity {capacity}); increase the average entries per row or the overflow fraction")]
    OverflowExhausted { row: usize, capacity: usize },
    #[error("invalid copy: {0}")]
    InvalidCopyState(String),
    #[error("{axis} index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize, axis: &'static str },
    #[error("no entry at ({row}, {col}) in the compressed pattern")]
    MissingEntry { row: usize, col: usize },
    #[error("{what}: expected length {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize, what: &'static str },
    #[error("structure mismatch: {0}")]
    StructureMismatch(String),
    #[error("row {row} is full (declared size {size})")]
    RowFull { row: usize, size: usize },
}

/// Coarse classification of a [`MatrixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad capacity parameters, mode/argument combinations or indices.
    Parameter,
    /// Operation called in the wrong lifecycle phase.
    State,
    /// Overflow pool depleted.
    Capacity,
    /// Copy or assignment between incompatible build states.
    Copy,
    /// Post-compression query or arithmetic on an incompatible operand.
    Query,
}

impl MatrixError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatrixError::InvalidParameter(_)
            | MatrixError::IndexOutOfRange { .. }
            | MatrixError::RowFull { .. } => ErrorKind::Parameter,
            MatrixError::InvalidState(_) => ErrorKind::State,
            MatrixError::OverflowExhausted { .. } => ErrorKind::Capacity,
            MatrixError::InvalidCopyState(_) => ErrorKind::Copy,
            MatrixError::MissingEntry { .. }
            | MatrixError::DimensionMismatch { .. }
            | MatrixError::StructureMismatch(_) => ErrorKind::Query,
        }
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        MatrixError::InvalidState(msg.into())
    }

    pub(crate) fn param(msg: impl Into<String>) -> Self {
        MatrixError::InvalidParameter(msg.into())
    }
}
