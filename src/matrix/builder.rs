//! Row-oriented proxy over an implicit-mode matrix.
//!
//! Lets assembly code written against "row, then column" access fill a
//! matrix that is still being built:
//!
//! ```rust
//! use bcrs_assembly::{BcrsMatrix, ImplicitMatrixBuilder};
//! let mut a = BcrsMatrix::<f64>::new();
//! {
//!     let mut b = ImplicitMatrixBuilder::with_size(&mut a, 2, 2, 2.0, 0.0).unwrap();
//!     let mut row = b.row(0).unwrap();
//!     *row.entry(0).unwrap() = 1.0;
//!     *row.entry(1).unwrap() = 2.0;
//! }
//! a.compress().unwrap();
//! assert_eq!(*a.get(0, 1).unwrap(), 2.0);
//! ```

use crate::config::ImplicitParameters;
use crate::error::MatrixError;
use crate::matrix::bcrs::BcrsMatrix;
use crate::matrix::block::Block;
use crate::matrix::build_mode::{BuildMode, BuildStage};

pub struct ImplicitMatrixBuilder<'a, B> {
    matrix: &'a mut BcrsMatrix<B>,
}

impl<'a, B: Block> ImplicitMatrixBuilder<'a, B> {
    /// Wrap a sized, uncompressed implicit-mode matrix.
    pub fn new(matrix: &'a mut BcrsMatrix<B>) -> Result<Self, MatrixError> {
        if matrix.build_mode() != BuildMode::Implicit {
            return Err(MatrixError::state(format!(
                "ImplicitMatrixBuilder requires implicit build mode, matrix is in {:?} mode",
                matrix.build_mode()
            )));
        }
        if !matrix.stage().is_mid_build() {
            return Err(MatrixError::state(format!(
                "ImplicitMatrixBuilder requires a sized, uncompressed matrix; it is {}",
                matrix.stage()
            )));
        }
        Ok(Self { matrix })
    }

    /// Configure an empty matrix for implicit assembly and wrap it.
    pub fn with_size(
        matrix: &'a mut BcrsMatrix<B>,
        rows: usize,
        cols: usize,
        average_entries_per_row: f64,
        overflow_fraction: f64,
    ) -> Result<Self, MatrixError> {
        if matrix.stage() != BuildStage::Unsized {
            return Err(MatrixError::state(format!(
                "ImplicitMatrixBuilder::with_size() requires an empty matrix; it is {}",
                matrix.stage()
            )));
        }
        ImplicitParameters::new(average_entries_per_row, overflow_fraction)?;
        let prior_mode = matrix.mode;
        let configured = matrix
            .set_build_mode(BuildMode::Implicit)
            .and_then(|()| matrix.set_implicit_build_mode_parameters(average_entries_per_row, overflow_fraction))
            .and_then(|()| matrix.set_size(rows, cols));
        if let Err(err) = configured {
            matrix.mode = prior_mode;
            return Err(err);
        }
        Ok(Self { matrix })
    }

    pub fn n(&self) -> usize {
        self.matrix.n()
    }

    pub fn m(&self) -> usize {
        self.matrix.m()
    }

    pub fn entry(&mut self, i: usize, j: usize) -> Result<&mut B, MatrixError> {
        self.matrix.entry(i, j)
    }

    /// Proxy for row `i`.
    pub fn row(&mut self, i: usize) -> Result<BuilderRow<'_, B>, MatrixError> {
        self.matrix.check_row(i)?;
        Ok(BuilderRow { matrix: &mut *self.matrix, row: i })
    }
}

/// One row of an [`ImplicitMatrixBuilder`].
pub struct BuilderRow<'b, B> {
    matrix: &'b mut BcrsMatrix<B>,
    row: usize,
}

impl<B: Block> BuilderRow<'_, B> {
    pub fn index(&self) -> usize {
        self.row
    }

    /// Accumulator for column `j` of this row.
    pub fn entry(&mut self, j: usize) -> Result<&mut B, MatrixError> {
        self.matrix.entry(self.row, j)
    }
}
