//! Solver-facing traits implemented by compressed matrices.
//!
//! Iterative solvers and preconditioners only need shape queries and the
//! action of the operator on a vector; these traits are that contract.

use crate::error::MatrixError;

/// Scalar shape of a linear operator.
pub trait MatShape {
    /// Number of scalar rows.
    fn nrows(&self) -> usize;
    /// Number of scalar columns.
    fn ncols(&self) -> usize;
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V) -> Result<(), MatrixError>;
}

/// Transposed product: y ← Aᵀ x.
pub trait MatTransVec<V> {
    /// Compute y = Aᵀ · x.
    fn mattransvec(&self, x: &V, y: &mut V) -> Result<(), MatrixError>;
}
