//! Capacity planning for implicit build mode.
//!
//! Each row reserves `ceil(avg)` slots up front. Entries beyond that are
//! served from an [`OverflowPool`] shared by all rows of one matrix, sized
//! `floor(N * avg * overflow) + SORT_RESERVE_ROWS * ceil(avg)`. The reserve
//! term keeps small matrices with a low overflow fraction usable.

use tracing::{debug, trace, warn};

use crate::config::ImplicitParameters;
use crate::error::MatrixError;

/// Storage layout chosen at sizing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Slots reserved in every row.
    pub base_per_row: usize,
    /// Units available in the overflow pool.
    pub pool_capacity: usize,
}

pub struct CapacityPlanner;

impl CapacityPlanner {
    /// Rows' worth of base capacity added to every pool.
    pub const SORT_RESERVE_ROWS: usize = 4;

    pub fn plan(rows: usize, params: &ImplicitParameters) -> CapacityPlan {
        let base_per_row = params.average_entries_per_row.ceil() as usize;
        let proportional =
            (rows as f64 * params.average_entries_per_row * params.overflow_fraction).floor() as usize;
        let plan = CapacityPlan {
            base_per_row,
            pool_capacity: proportional + Self::SORT_RESERVE_ROWS * base_per_row,
        };
        debug!(
            rows,
            avg = params.average_entries_per_row,
            overflow = params.overflow_fraction,
            base_per_row = plan.base_per_row,
            pool_capacity = plan.pool_capacity,
            "planned implicit capacity"
        );
        plan
    }
}

/// Shared reserve drawn on by rows that outgrow their base allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowPool {
    capacity: usize,
    drawn: usize,
}

impl OverflowPool {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, drawn: 0 }
    }

    /// Take one unit for `row`; fails without side effects when empty.
    pub fn draw(&mut self, row: usize) -> Result<(), MatrixError> {
        if self.drawn >= self.capacity {
            warn!(row, capacity = self.capacity, "overflow pool exhausted");
            return Err(MatrixError::OverflowExhausted { row, capacity: self.capacity });
        }
        self.drawn += 1;
        trace!(row, drawn = self.drawn, remaining = self.remaining(), "overflow draw");
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_rounds_average_up() {
        let params = ImplicitParameters::new(2.5, 0.0).unwrap();
        let plan = CapacityPlanner::plan(10, &params);
        assert_eq!(plan.base_per_row, 3);
        assert_eq!(plan.pool_capacity, 4 * 3);
    }

    #[test]
    fn plan_scales_pool_with_rows() {
        let params = ImplicitParameters::new(3.0, 0.1).unwrap();
        let plan = CapacityPlanner::plan(100, &params);
        assert_eq!(plan.pool_capacity, 30 + 12);
    }

    #[test]
    fn pool_exhaustion() {
        let mut pool = OverflowPool::new(2);
        pool.draw(0).unwrap();
        pool.draw(1).unwrap();
        let err = pool.draw(7).unwrap_err();
        assert_eq!(err, MatrixError::OverflowExhausted { row: 7, capacity: 2 });
        assert_eq!(pool.drawn(), 2);
        assert_eq!(pool.remaining(), 0);
    }
}
