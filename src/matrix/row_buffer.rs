//! Per-row entry storage used while a matrix is being built.

use crate::matrix::block::Block;

/// Where a newly inserted entry was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Base,
    Overflow,
}

/// Unsorted `(column, value)` entries of one row.
///
/// The base part is allocated once with the planned capacity and never
/// reallocates; entries past it go to a separate overflow list whose growth
/// is paid for by the matrix's overflow pool.
#[derive(Debug, Clone)]
pub struct RowBuffer<B> {
    base: Vec<(usize, B)>,
    overflow: Vec<(usize, B)>,
    base_capacity: usize,
}

impl<B: Block> RowBuffer<B> {
    pub fn with_capacity(base_capacity: usize) -> Self {
        Self { base: Vec::with_capacity(base_capacity), overflow: Vec::new(), base_capacity }
    }

    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    pub fn has_base_room(&self) -> bool {
        self.base.len() < self.base_capacity
    }

    /// Position of the first entry for `col`, counting base slots first.
    pub fn position(&self, col: usize) -> Option<usize> {
        self.base.iter().chain(self.overflow.iter()).position(|(c, _)| *c == col)
    }

    /// Value at a position returned by [`RowBuffer::position`].
    pub fn value_mut(&mut self, pos: usize) -> &mut B {
        match pos.checked_sub(self.base.len()) {
            None => &mut self.base[pos].1,
            Some(k) => &mut self.overflow[k].1,
        }
    }

    pub fn contains(&self, col: usize) -> bool {
        self.base.iter().chain(self.overflow.iter()).any(|(c, _)| *c == col)
    }

    /// Append without lookup. The caller decides `slot` after checking
    /// [`RowBuffer::has_base_room`] and, for overflow, drawing from the pool.
    pub fn push(&mut self, col: usize, value: B, slot: Slot) -> &mut B {
        let list = match slot {
            Slot::Base => &mut self.base,
            Slot::Overflow => &mut self.overflow,
        };
        list.push((col, value));
        let last = list.len() - 1;
        &mut list[last].1
    }

    /// Consume the row, yielding all raw entries.
    pub fn into_entries(self) -> Vec<(usize, B)> {
        let mut entries = self.base;
        entries.extend(self.overflow);
        entries
    }
}
