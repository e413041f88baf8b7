//! Post-compression access: row views, iteration and element lookup.
//!
//! All accessors fail with a state error until the matrix is compressed.
//! Lookups of positions outside the frozen pattern fail with
//! [`MatrixError::MissingEntry`]; nothing is ever inserted here.

use crate::error::MatrixError;
use crate::matrix::bcrs::BcrsMatrix;
use crate::matrix::block::Block;
use crate::matrix::build_mode::Capabilities;
use crate::matrix::compress::CompactStorage;

/// Read-only view of one compressed row.
#[derive(Debug)]
pub struct RowRef<'a, B> {
    index: usize,
    cols: &'a [usize],
    values: &'a [B],
}

impl<B> Clone for RowRef<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for RowRef<'_, B> {}

impl<'a, B> RowRef<'a, B> {
    /// Row number.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Column indices, strictly ascending.
    pub fn columns(&self) -> &'a [usize] {
        self.cols
    }

    pub fn values(&self) -> &'a [B] {
        self.values
    }

    /// `(column, value)` pairs in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a B)> + use<'a, B> {
        let (cols, values) = (self.cols, self.values);
        cols.iter().copied().zip(values.iter())
    }

    pub fn get(&self, col: usize) -> Option<&'a B> {
        let values = self.values;
        self.cols.binary_search(&col).ok().map(move |k| &values[k])
    }
}

/// Mutable view of one compressed row; values only, the pattern is fixed.
#[derive(Debug)]
pub struct RowMut<'a, B> {
    index: usize,
    cols: &'a [usize],
    values: &'a mut [B],
}

impl<'a, B> RowMut<'a, B> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    pub fn columns(&self) -> &[usize] {
        self.cols
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut B)> + '_ {
        self.cols.iter().copied().zip(self.values.iter_mut())
    }

    pub fn get_mut(&mut self, col: usize) -> Option<&mut B> {
        match self.cols.binary_search(&col) {
            Ok(k) => Some(&mut self.values[k]),
            Err(_) => None,
        }
    }
}

impl<B: Block> BcrsMatrix<B> {
    pub(crate) fn require_compressed(&self, op: &str) -> Result<(), MatrixError> {
        self.stage.require(Capabilities::ACCESS, op)
    }

    /// Row `i` of a compressed matrix.
    pub fn row(&self, i: usize) -> Result<RowRef<'_, B>, MatrixError> {
        self.require_compressed("row access")?;
        self.check_row(i)?;
        let range = self.storage.row_range(i);
        Ok(RowRef {
            index: i,
            cols: &self.storage.col_idx[range.clone()],
            values: &self.storage.values[range],
        })
    }

    /// Mutable row `i` of a compressed matrix.
    pub fn row_mut(&mut self, i: usize) -> Result<RowMut<'_, B>, MatrixError> {
        self.require_compressed("mutable row access")?;
        self.check_row(i)?;
        let range = self.storage.row_range(i);
        Ok(RowMut {
            index: i,
            cols: &self.storage.col_idx[range.clone()],
            values: &mut self.storage.values[range],
        })
    }

    /// All rows in order.
    pub fn rows(&self) -> Result<impl Iterator<Item = RowRef<'_, B>> + '_, MatrixError> {
        self.require_compressed("row iteration")?;
        let storage = &self.storage;
        Ok((0..self.n).map(move |i| {
            let range = storage.row_range(i);
            RowRef { index: i, cols: &storage.col_idx[range.clone()], values: &storage.values[range] }
        }))
    }

    /// Block at (`i`, `j`).
    pub fn get(&self, i: usize, j: usize) -> Result<&B, MatrixError> {
        let k = self.locate(i, j, "element access")?;
        Ok(&self.storage.values[k])
    }

    /// Mutable block at (`i`, `j`).
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut B, MatrixError> {
        let k = self.locate(i, j, "mutable element access")?;
        Ok(&mut self.storage.values[k])
    }

    /// Whether (`i`, `j`) is part of the compressed pattern.
    pub fn exists(&self, i: usize, j: usize) -> Result<bool, MatrixError> {
        self.require_compressed("exists()")?;
        self.check_row(i)?;
        self.check_col(j)?;
        Ok(self.storage.find(i, j).is_some())
    }

    /// Raw compacted storage.
    pub fn storage(&self) -> Result<&CompactStorage<B>, MatrixError> {
        self.require_compressed("storage()")?;
        Ok(&self.storage)
    }

    fn locate(&self, i: usize, j: usize, op: &str) -> Result<usize, MatrixError> {
        self.require_compressed(op)?;
        self.check_row(i)?;
        self.check_col(j)?;
        self.storage.find(i, j).ok_or(MatrixError::MissingEntry { row: i, col: j })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, MatrixError};
    use crate::matrix::BcrsMatrix;

    fn small() -> BcrsMatrix<f64> {
        let mut a = BcrsMatrix::new_implicit(3, 3, 2.0, 0.0).unwrap();
        a.add_entry(0, 2, 1.0).unwrap();
        a.add_entry(0, 0, 4.0).unwrap();
        a.add_entry(2, 1, 3.0).unwrap();
        a.compress().unwrap();
        a
    }

    #[test]
    fn access_before_compress_fails() {
        let mut a = BcrsMatrix::<f64>::new_implicit(3, 3, 2.0, 0.0).unwrap();
        a.add_entry(1, 1, 1.0).unwrap();
        assert_eq!(a.get(1, 1).unwrap_err().kind(), ErrorKind::State);
        assert_eq!(a.get_mut(1, 1).unwrap_err().kind(), ErrorKind::State);
        assert!(a.row(1).is_err());
        assert!(a.rows().is_err());
    }

    #[test]
    fn rows_iterate_in_column_order() {
        let a = small();
        let row0: Vec<(usize, f64)> = a.row(0).unwrap().iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(row0, vec![(0, 4.0), (2, 1.0)]);
        assert!(a.row(1).unwrap().is_empty());
        assert_eq!(a.rows().unwrap().map(|r| r.len()).collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn missing_entry_is_query_error() {
        let mut a = small();
        assert_eq!(a.get(1, 1).unwrap_err(), MatrixError::MissingEntry { row: 1, col: 1 });
        assert!(!a.exists(0, 1).unwrap());
        *a.get_mut(2, 1).unwrap() = -3.0;
        assert_eq!(*a.get(2, 1).unwrap(), -3.0);
        let mut row = a.row_mut(0).unwrap();
        *row.get_mut(2).unwrap() += 1.0;
        assert!(row.get_mut(1).is_none());
        assert_eq!(*a.get(0, 2).unwrap(), 2.0);
    }
}
