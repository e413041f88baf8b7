//! Numerical operations on compressed matrices.
//!
//! Vectors are flat scalar slices: a vector in the domain of an `n × m`
//! block matrix has `m * B::COLS` components, a range vector `n * B::ROWS`.
//! Every operation requires a compressed matrix; pairwise operations also
//! require identical patterns.

use num_traits::{Float, One, Zero};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::core::traits::{MatShape, MatTransVec, MatVec};
use crate::error::MatrixError;
use crate::matrix::bcrs::BcrsMatrix;
use crate::matrix::block::Block;

impl<B: Block> BcrsMatrix<B> {
    /// Scalar rows: `n * B::ROWS`.
    pub fn row_dim(&self) -> usize {
        self.n * B::ROWS
    }

    /// Scalar columns: `m * B::COLS`.
    pub fn col_dim(&self) -> usize {
        self.m * B::COLS
    }

    /// Scalar rows of block row `i`.
    pub fn row_dim_of(&self, i: usize) -> Result<usize, MatrixError> {
        self.check_row(i)?;
        Ok(B::ROWS)
    }

    /// Scalar columns of block column `j`.
    pub fn col_dim_of(&self, j: usize) -> Result<usize, MatrixError> {
        self.check_col(j)?;
        Ok(B::COLS)
    }

    /// Set every stored scalar to `value`.
    pub fn fill(&mut self, value: B::Field) -> Result<(), MatrixError> {
        self.require_compressed("fill()")?;
        self.storage.values.iter_mut().for_each(|b| b.fill(value));
        Ok(())
    }

    /// Multiply every stored block by `alpha`.
    pub fn scale(&mut self, alpha: B::Field) -> Result<(), MatrixError> {
        self.require_compressed("scale()")?;
        self.storage.values.iter_mut().for_each(|b| b.scale(alpha));
        Ok(())
    }

    /// Both compressed with the same dimensions, row offsets and columns.
    pub fn pattern_matches(&self, other: &Self) -> bool {
        self.is_compressed()
            && other.is_compressed()
            && self.n == other.n
            && self.m == other.m
            && self.storage.row_ptr == other.storage.row_ptr
            && self.storage.col_idx == other.storage.col_idx
    }

    /// `self += other`.
    pub fn add_assign_matrix(&mut self, other: &Self) -> Result<(), MatrixError> {
        self.check_compatible(other, "add_assign_matrix()")?;
        for (a, b) in self.storage.values.iter_mut().zip(&other.storage.values) {
            *a += b.clone();
        }
        Ok(())
    }

    /// `self -= other`.
    pub fn sub_assign_matrix(&mut self, other: &Self) -> Result<(), MatrixError> {
        self.check_compatible(other, "sub_assign_matrix()")?;
        for (a, b) in self.storage.values.iter_mut().zip(&other.storage.values) {
            *a -= b.clone();
        }
        Ok(())
    }

    /// `self += alpha * other`.
    pub fn axpy(&mut self, alpha: B::Field, other: &Self) -> Result<(), MatrixError> {
        self.check_compatible(other, "axpy()")?;
        for (a, b) in self.storage.values.iter_mut().zip(&other.storage.values) {
            a.axpy(alpha, b);
        }
        Ok(())
    }

    /// y = A x
    pub fn mv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, false, "mv()")?;
        y.iter_mut().for_each(|v| *v = B::Field::zero());
        self.apply(B::Field::one(), x, y);
        Ok(())
    }

    /// y += A x
    pub fn umv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmv(B::Field::one(), x, y)
    }

    /// y -= A x
    pub fn mmv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmv(-B::Field::one(), x, y)
    }

    /// y += alpha A x
    pub fn usmv(&self, alpha: B::Field, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, false, "usmv()")?;
        self.apply(alpha, x, y);
        Ok(())
    }

    /// y = Aᵀ x
    pub fn mtv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, true, "mtv()")?;
        y.iter_mut().for_each(|v| *v = B::Field::zero());
        self.apply_transposed(B::Field::one(), x, y, false);
        Ok(())
    }

    /// y += Aᵀ x
    pub fn umtv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmtv(B::Field::one(), x, y)
    }

    /// y -= Aᵀ x
    pub fn mmtv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmtv(-B::Field::one(), x, y)
    }

    /// y += alpha Aᵀ x
    pub fn usmtv(&self, alpha: B::Field, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, true, "usmtv()")?;
        self.apply_transposed(alpha, x, y, false);
        Ok(())
    }

    /// y += Aᴴ x
    pub fn umhv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmhv(B::Field::one(), x, y)
    }

    /// y -= Aᴴ x
    pub fn mmhv(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.usmhv(-B::Field::one(), x, y)
    }

    /// y += alpha Aᴴ x
    pub fn usmhv(&self, alpha: B::Field, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, true, "usmhv()")?;
        self.apply_transposed(alpha, x, y, true);
        Ok(())
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> Result<B::Field, MatrixError> {
        Ok(self.frobenius_norm2()?.sqrt())
    }

    /// Squared Frobenius norm.
    pub fn frobenius_norm2(&self) -> Result<B::Field, MatrixError> {
        self.require_compressed("frobenius_norm2()")?;
        Ok(self
            .storage
            .values
            .iter()
            .fold(B::Field::zero(), |acc, b| acc + b.frobenius_norm2()))
    }

    /// Row-sum norm: maximum over block rows of the summed block norms.
    pub fn infinity_norm(&self) -> Result<B::Field, MatrixError> {
        self.require_compressed("infinity_norm()")?;
        Ok(self.max_row_sum(B::infinity_norm))
    }

    /// As [`BcrsMatrix::infinity_norm`] with the Manhattan norm on components.
    pub fn infinity_norm_real(&self) -> Result<B::Field, MatrixError> {
        self.require_compressed("infinity_norm_real()")?;
        Ok(self.max_row_sum(B::infinity_norm_real))
    }

    fn max_row_sum(&self, norm: impl Fn(&B) -> B::Field) -> B::Field {
        (0..self.n)
            .map(|i| {
                self.storage.values[self.storage.row_range(i)]
                    .iter()
                    .fold(B::Field::zero(), |acc, b| acc + norm(b))
            })
            .fold(B::Field::zero(), Float::max)
    }

    fn apply(&self, alpha: B::Field, x: &[B::Field], y: &mut [B::Field]) {
        let (r, c) = (B::ROWS, B::COLS);
        for i in 0..self.n {
            let yi = &mut y[i * r..(i + 1) * r];
            for k in self.storage.row_range(i) {
                let j = self.storage.col_idx[k];
                self.storage.values[k].usmv(alpha, &x[j * c..(j + 1) * c], yi);
            }
        }
    }

    fn apply_transposed(&self, alpha: B::Field, x: &[B::Field], y: &mut [B::Field], hermitian: bool) {
        let (r, c) = (B::ROWS, B::COLS);
        for i in 0..self.n {
            let xi = &x[i * r..(i + 1) * r];
            for k in self.storage.row_range(i) {
                let j = self.storage.col_idx[k];
                let yj = &mut y[j * c..(j + 1) * c];
                if hermitian {
                    self.storage.values[k].usmhv(alpha, xi, yj);
                } else {
                    self.storage.values[k].usmtv(alpha, xi, yj);
                }
            }
        }
    }

    fn check_lengths(
        &self,
        x: &[B::Field],
        y: &[B::Field],
        transposed: bool,
        op: &str,
    ) -> Result<(), MatrixError> {
        self.require_compressed(op)?;
        let (domain, range) = if transposed {
            (self.row_dim(), self.col_dim())
        } else {
            (self.col_dim(), self.row_dim())
        };
        if x.len() != domain {
            return Err(MatrixError::DimensionMismatch { expected: domain, found: x.len(), what: "input vector" });
        }
        if y.len() != range {
            return Err(MatrixError::DimensionMismatch { expected: range, found: y.len(), what: "output vector" });
        }
        Ok(())
    }

    fn check_compatible(&self, other: &Self, op: &str) -> Result<(), MatrixError> {
        self.require_compressed(op)?;
        other.require_compressed(op)?;
        if !self.pattern_matches(other) {
            return Err(MatrixError::StructureMismatch(format!(
                "{op}: operands have different sparsity patterns"
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "rayon")]
impl<B: Block> BcrsMatrix<B> {
    /// Parallel y = A x using Rayon; block rows are processed independently.
    pub fn mv_parallel(&self, x: &[B::Field], y: &mut [B::Field]) -> Result<(), MatrixError> {
        self.check_lengths(x, y, false, "mv_parallel()")?;
        let (r, c) = (B::ROWS, B::COLS);
        let storage = &self.storage;
        y.par_chunks_mut(r).enumerate().for_each(|(i, yi)| {
            yi.iter_mut().for_each(|v| *v = B::Field::zero());
            for k in storage.row_range(i) {
                let j = storage.col_idx[k];
                storage.values[k].usmv(B::Field::one(), &x[j * c..(j + 1) * c], yi);
            }
        });
        Ok(())
    }
}

impl<B: Block> MatShape for BcrsMatrix<B> {
    fn nrows(&self) -> usize {
        self.row_dim()
    }
    fn ncols(&self) -> usize {
        self.col_dim()
    }
}

impl<B: Block> MatVec<Vec<B::Field>> for BcrsMatrix<B> {
    fn matvec(&self, x: &Vec<B::Field>, y: &mut Vec<B::Field>) -> Result<(), MatrixError> {
        self.mv(x, y)
    }
}

impl<B: Block> MatTransVec<Vec<B::Field>> for BcrsMatrix<B> {
    fn mattransvec(&self, x: &Vec<B::Field>, y: &mut Vec<B::Field>) -> Result<(), MatrixError> {
        self.mtv(x, y)
    }
}
