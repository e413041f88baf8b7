//! Compression engine: build buffers to compacted row storage.
//!
//! Every row is sorted by column and runs of equal columns are merged by
//! summation. The merged rows are then packed into one contiguous
//! `row_ptr` / `col_idx` / `values` block. Rows are independent, so with the
//! `rayon` feature the sort/merge step runs in parallel.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::matrix::block::Block;
use crate::matrix::row_buffer::RowBuffer;

/// Result of a successful compression.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressionStatistics {
    /// Average number of entries per row after merging.
    pub avg: f64,
    /// Largest number of entries in a single row.
    pub maximum: usize,
    /// Entries that were served from the overflow pool during insertion.
    pub overflow_total: usize,
}

/// Compacted row storage.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CompactStorage<B> {
    pub(crate) row_ptr: Vec<usize>,
    pub(crate) col_idx: Vec<usize>,
    pub(crate) values: Vec<B>,
}

impl<B> CompactStorage<B> {
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    pub fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_ptr[row]..self.row_ptr[row + 1]
    }

    /// Position of `col` inside the row's slice of `col_idx`.
    pub fn find(&self, row: usize, col: usize) -> Option<usize> {
        let range = self.row_range(row);
        self.col_idx[range.clone()].binary_search(&col).ok().map(|k| range.start + k)
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[B] {
        &self.values
    }
}

/// Sort one row by column and sum duplicate columns.
pub fn merge_row<B: Block>(mut entries: Vec<(usize, B)>) -> Vec<(usize, B)> {
    entries.sort_unstable_by_key(|(c, _)| *c);
    let mut merged: Vec<(usize, B)> = Vec::with_capacity(entries.len());
    for (col, value) in entries {
        match merged.last_mut() {
            Some((last, acc)) if *last == col => *acc += value,
            _ => merged.push((col, value)),
        }
    }
    merged
}

/// Compress all rows. `overflow_total` is the number of pool draws made
/// during insertion.
pub fn compress_rows<B: Block>(
    rows: Vec<RowBuffer<B>>,
    overflow_total: usize,
) -> (CompactStorage<B>, CompressionStatistics) {
    let n = rows.len();

    #[cfg(feature = "rayon")]
    let merged: Vec<Vec<(usize, B)>> =
        rows.into_par_iter().map(|row| merge_row(row.into_entries())).collect();
    #[cfg(not(feature = "rayon"))]
    let merged: Vec<Vec<(usize, B)>> =
        rows.into_iter().map(|row| merge_row(row.into_entries())).collect();

    let total: usize = merged.iter().map(Vec::len).sum();
    let maximum = merged.iter().map(Vec::len).max().unwrap_or(0);

    let mut storage = CompactStorage {
        row_ptr: Vec::with_capacity(n + 1),
        col_idx: Vec::with_capacity(total),
        values: Vec::with_capacity(total),
    };
    storage.row_ptr.push(0);
    for row in merged {
        for (col, value) in row {
            storage.col_idx.push(col);
            storage.values.push(value);
        }
        storage.row_ptr.push(storage.col_idx.len());
    }

    let stats = CompressionStatistics {
        avg: if n == 0 { 0.0 } else { total as f64 / n as f64 },
        maximum,
        overflow_total,
    };
    debug!(rows = n, nnz = total, avg = stats.avg, maximum, overflow_total, "compressed matrix");
    (storage, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::row_buffer::Slot;

    #[test]
    fn merge_sums_duplicates_and_sorts() {
        let merged = merge_row(vec![(3, 1.0), (1, 2.0), (3, 4.0), (0, 1.0), (1, -1.0)]);
        assert_eq!(merged, vec![(0, 1.0), (1, 1.0), (3, 5.0)]);
    }

    #[test]
    fn compress_packs_rows() {
        let mut r0 = RowBuffer::<f64>::with_capacity(2);
        r0.push(2, 1.0, Slot::Base);
        r0.push(0, 2.0, Slot::Base);
        r0.push(2, 3.0, Slot::Overflow);
        let r1 = RowBuffer::<f64>::with_capacity(2);
        let mut r2 = RowBuffer::<f64>::with_capacity(2);
        r2.push(1, 7.0, Slot::Base);

        let (storage, stats) = compress_rows(vec![r0, r1, r2], 1);
        assert_eq!(storage.row_ptr(), &[0, 2, 2, 3]);
        assert_eq!(storage.col_idx(), &[0, 2, 1]);
        assert_eq!(storage.values(), &[2.0, 4.0, 7.0]);
        assert_eq!(storage.find(0, 2), Some(1));
        assert_eq!(storage.find(1, 0), None);
        assert_eq!(stats.maximum, 2);
        assert_eq!(stats.overflow_total, 1);
        assert!((stats.avg - 1.0).abs() < 1e-15);
    }

    #[test]
    fn empty_matrix_statistics() {
        let (storage, stats) = compress_rows(Vec::<RowBuffer<f64>>::new(), 0);
        assert_eq!(storage.row_ptr(), &[0]);
        assert_eq!(stats, CompressionStatistics { avg: 0.0, maximum: 0, overflow_total: 0 });
    }
}
