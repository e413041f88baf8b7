// Scalar CSR hand-off to faer for external direct solvers.

use faer::sparse::{
    SymbolicSparseRowMat,    // owning symbolic CSR alias
    SparseRowMat,            // owning numeric CSR alias
};
use faer::traits::ComplexField;

use crate::error::MatrixError;
use crate::matrix::bcrs::BcrsMatrix;
use crate::matrix::block::Block;

/// Scalar CSR matrix backed by `faer`.
pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
    nnz: usize,
}

impl<T: ComplexField + Copy> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        let nnz = values.len();
        // `None`: no separate row_nnz, rows are contiguous
        let symbolic = SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptr, None, col_idx);
        let inner = SparseRowMat::new(symbolic, values);
        Self { inner, nnz }
    }

    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    /// Stored scalars, explicit zeros inside blocks included.
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    pub fn as_faer(&self) -> &SparseRowMat<usize, T> {
        &self.inner
    }

    pub fn into_faer(self) -> SparseRowMat<usize, T> {
        self.inner
    }

    pub fn to_dense(&self) -> faer::Mat<T> {
        self.inner.to_dense()
    }
}

impl<B: Block> BcrsMatrix<B>
where
    B::Field: ComplexField,
{
    /// Expand blocks row-major into a scalar CSR matrix.
    pub fn to_csr(&self) -> Result<CsrMatrix<B::Field>, MatrixError> {
        self.require_compressed("to_csr()")?;
        let (r, c) = (B::ROWS, B::COLS);
        let scalar_nnz = self.nonzeroes() * r * c;
        let mut row_ptr = Vec::with_capacity(self.row_dim() + 1);
        let mut col_idx = Vec::with_capacity(scalar_nnz);
        let mut values = Vec::with_capacity(scalar_nnz);
        row_ptr.push(0);
        for row in self.rows()? {
            for lr in 0..r {
                for (j, block) in row.iter() {
                    for lc in 0..c {
                        col_idx.push(j * c + lc);
                        values.push(block.at(lr, lc));
                    }
                }
                row_ptr.push(col_idx.len());
            }
        }
        Ok(CsrMatrix::from_csr(self.row_dim(), self.col_dim(), row_ptr, col_idx, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::block::DenseBlock;

    #[test]
    fn identity_to_faer() {
        let mut a = BcrsMatrix::<f64>::new_implicit(3, 3, 1.0, 0.0).unwrap();
        for i in (0..3).rev() {
            *a.entry(i, i).unwrap() = 1.0;
        }
        a.compress().unwrap();
        let csr = a.to_csr().unwrap();
        assert_eq!((csr.nrows(), csr.ncols(), csr.nnz()), (3, 3, 3));
        let dense = csr.to_dense();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(dense[(i, j)], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn blocks_expand_row_major() {
        // 1×2 block matrix of 2×2 blocks: [[1,2 | 0,0],[3,4 | 0,5]]
        let mut a = BcrsMatrix::<DenseBlock<f64, 2, 2>>::new_implicit(1, 2, 2.0, 0.0).unwrap();
        *a.entry(0, 1).unwrap() = DenseBlock::from_rows([[0.0, 0.0], [0.0, 5.0]]);
        *a.entry(0, 0).unwrap() = DenseBlock::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        a.compress().unwrap();
        let csr = a.to_csr().unwrap();
        assert_eq!((csr.nrows(), csr.ncols(), csr.nnz()), (2, 4, 8));
        let dense = csr.to_dense();
        assert_eq!(dense[(0, 1)], 2.0);
        assert_eq!(dense[(1, 0)], 3.0);
        assert_eq!(dense[(1, 3)], 5.0);
        assert_eq!(dense[(0, 3)], 0.0);
    }

    #[test]
    fn uncompressed_matrix_cannot_be_exported() {
        let a = BcrsMatrix::<f64>::new_implicit(2, 2, 1.0, 0.0).unwrap();
        assert!(a.to_csr().is_err());
    }
}
