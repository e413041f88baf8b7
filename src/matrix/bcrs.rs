//! Block compressed row storage matrix and its build state machine.
//!
//! A matrix goes through `Unsized → Sized → Building → Compressed`. The build
//! mode (implicit or random) is chosen before sizing and decides which
//! insertion API is available:
//!
//! - **implicit**: `entry(i, j)` / `add_entry(i, j, v)` in any order and
//!   multiplicity; storage is planned from an average-degree estimate plus a
//!   shared overflow pool (see [`crate::matrix::capacity`]).
//! - **random**: `set_row_size` for every row, `end_row_sizes`, `add_index`
//!   in any order, then `end_indices`.
//!
//! `compress()` (or `end_indices()`) runs the compression engine once. After
//! that the structure is frozen while values stay mutable through the
//! indexed access layer.
//!
//! # Example
//! ```rust
//! use bcrs_assembly::BcrsMatrix;
//! let mut a = BcrsMatrix::<f64>::new_implicit(3, 3, 2.0, 0.5).unwrap();
//! for i in 0..3 {
//!     *a.entry(i, i).unwrap() += 2.0;
//!     if i > 0 {
//!         *a.entry(i, i - 1).unwrap() -= 1.0;
//!     }
//! }
//! let stats = a.compress().unwrap();
//! assert_eq!(stats.maximum, 2);
//! assert_eq!(*a.get(2, 1).unwrap(), -1.0);
//! ```

use tracing::debug;

use crate::config::ImplicitParameters;
use crate::error::MatrixError;
use crate::matrix::block::Block;
use crate::matrix::build_mode::{BuildMode, BuildStage, Capabilities};
use crate::matrix::capacity::{CapacityPlan, CapacityPlanner, OverflowPool};
use crate::matrix::compress::{compress_rows, CompactStorage, CompressionStatistics};
use crate::matrix::row_buffer::{RowBuffer, Slot};

/// Storage that only exists between sizing and compression.
#[derive(Debug)]
pub(crate) struct BuildBuffers<B> {
    rows: Vec<RowBuffer<B>>,
    pool: OverflowPool,
    plan: Option<CapacityPlan>,
    // random mode only
    row_sizes: Vec<usize>,
    nnz_limit: Option<usize>,
}

/// Sparse matrix of `B` blocks with implicit or random assembly.
#[derive(Debug)]
pub struct BcrsMatrix<B> {
    pub(crate) n: usize,
    pub(crate) m: usize,
    pub(crate) mode: BuildMode,
    pub(crate) stage: BuildStage,
    pub(crate) params: Option<ImplicitParameters>,
    pub(crate) build: Option<BuildBuffers<B>>,
    pub(crate) storage: CompactStorage<B>,
    pub(crate) stats: Option<CompressionStatistics>,
}

impl<B> Default for BcrsMatrix<B> {
    fn default() -> Self {
        Self {
            n: 0,
            m: 0,
            mode: BuildMode::Unset,
            stage: BuildStage::Unsized,
            params: None,
            build: None,
            storage: CompactStorage { row_ptr: vec![0], col_idx: Vec::new(), values: Vec::new() },
            stats: None,
        }
    }
}

impl<B: Block> BcrsMatrix<B> {
    /// Empty matrix: no dimensions, no build mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sized implicit-mode matrix.
    pub fn new_implicit(
        n: usize,
        m: usize,
        average_entries_per_row: f64,
        overflow_fraction: f64,
    ) -> Result<Self, MatrixError> {
        Self::with_build_parameters(n, m, average_entries_per_row, overflow_fraction, BuildMode::Implicit)
    }

    /// Sized matrix with implicit parameters. Only [`BuildMode::Implicit`]
    /// accepts them; any other mode is a parameter error.
    pub fn with_build_parameters(
        n: usize,
        m: usize,
        average_entries_per_row: f64,
        overflow_fraction: f64,
        mode: BuildMode,
    ) -> Result<Self, MatrixError> {
        if mode != BuildMode::Implicit {
            return Err(MatrixError::param(format!(
                "average/overflow parameters are only meaningful in implicit build mode, got {mode:?}"
            )));
        }
        let mut matrix = Self::new();
        matrix.set_build_mode(mode)?;
        matrix.set_implicit_build_mode_parameters(average_entries_per_row, overflow_fraction)?;
        matrix.set_size(n, m)?;
        Ok(matrix)
    }

    /// Sized matrix in `mode`; implicit mode uses default parameters.
    pub fn with_size(n: usize, m: usize, mode: BuildMode) -> Result<Self, MatrixError> {
        let mut matrix = Self::new();
        matrix.set_build_mode(mode)?;
        matrix.set_size(n, m)?;
        Ok(matrix)
    }

    /// Choose the build mode. Only before sizing; once chosen it cannot change.
    pub fn set_build_mode(&mut self, mode: BuildMode) -> Result<(), MatrixError> {
        self.stage.require(Capabilities::CONFIGURE, "set_build_mode()")?;
        if mode == BuildMode::Unset {
            return Err(MatrixError::param("cannot set the build mode to Unset"));
        }
        if self.mode != BuildMode::Unset && self.mode != mode {
            return Err(MatrixError::state(format!(
                "build mode is already {:?}, cannot change it to {mode:?}",
                self.mode
            )));
        }
        if mode == BuildMode::Random && self.params.is_some() {
            return Err(MatrixError::param("implicit parameters are set; random build mode cannot use them"));
        }
        self.mode = mode;
        Ok(())
    }

    /// Fix the implicit-mode capacity parameters. Only before sizing, once.
    pub fn set_implicit_build_mode_parameters(
        &mut self,
        average_entries_per_row: f64,
        overflow_fraction: f64,
    ) -> Result<(), MatrixError> {
        self.stage.require(Capabilities::CONFIGURE, "set_implicit_build_mode_parameters()")?;
        if self.params.is_some() {
            return Err(MatrixError::state("implicit build mode parameters are already set"));
        }
        if self.mode == BuildMode::Random {
            return Err(MatrixError::param("implicit parameters cannot be used in random build mode"));
        }
        self.params = Some(ImplicitParameters::new(average_entries_per_row, overflow_fraction)?);
        Ok(())
    }

    /// Fix the block dimensions `n × m`.
    pub fn set_size(&mut self, n: usize, m: usize) -> Result<(), MatrixError> {
        self.set_size_with_nonzeroes(n, m, 0)
    }

    /// Fix the dimensions with an explicit nonzero count.
    ///
    /// In random mode `nnz` (if nonzero) bounds the sum of declared row
    /// sizes. In implicit mode capacity is planned internally and a nonzero
    /// `nnz` is rejected. Re-sizing is allowed until the first insertion.
    pub fn set_size_with_nonzeroes(&mut self, n: usize, m: usize, nnz: usize) -> Result<(), MatrixError> {
        self.stage.require(Capabilities::RESIZE, "set_size()")?;
        let buffers = match self.mode {
            BuildMode::Unset => {
                return Err(MatrixError::state("a build mode must be chosen before set_size()"));
            }
            BuildMode::Implicit => {
                if nnz != 0 {
                    return Err(MatrixError::state(
                        "implicit build mode computes the nonzero count at compression; set_size() must not supply one",
                    ));
                }
                let params = *self.params.get_or_insert_with(ImplicitParameters::default);
                let plan = CapacityPlanner::plan(n, &params);
                BuildBuffers {
                    rows: (0..n).map(|_| RowBuffer::with_capacity(plan.base_per_row)).collect(),
                    pool: OverflowPool::new(plan.pool_capacity),
                    plan: Some(plan),
                    row_sizes: Vec::new(),
                    nnz_limit: None,
                }
            }
            BuildMode::Random => BuildBuffers {
                rows: Vec::new(),
                pool: OverflowPool::new(0),
                plan: None,
                row_sizes: vec![0; n],
                nnz_limit: (nnz > 0).then_some(nnz),
            },
        };
        debug!(n, m, mode = ?self.mode, "sized matrix");
        self.n = n;
        self.m = m;
        self.build = Some(buffers);
        self.stage = BuildStage::Sized;
        Ok(())
    }

    /// Accumulator for position (`i`, `j`), created as zero on first use.
    ///
    /// Implicit mode only, before compression. Repeated calls at the same
    /// position return the same accumulator.
    pub fn entry(&mut self, i: usize, j: usize) -> Result<&mut B, MatrixError> {
        self.check_implicit_insert("entry()", i, j)?;
        let stage = self.stage;
        let build = self.build.as_mut().ok_or_else(|| missing_buffers(stage))?;
        let row = &mut build.rows[i];
        let value = match row.position(j) {
            Some(pos) => row.value_mut(pos),
            None => {
                let slot = if row.has_base_room() {
                    Slot::Base
                } else {
                    build.pool.draw(i)?;
                    Slot::Overflow
                };
                row.push(j, B::zero(), slot)
            }
        };
        self.stage = BuildStage::Building;
        Ok(value)
    }

    /// Append `value` at (`i`, `j`) without looking for an existing entry.
    ///
    /// Duplicates are summed by `compress()`. Every call consumes a slot.
    pub fn add_entry(&mut self, i: usize, j: usize, value: B) -> Result<(), MatrixError> {
        self.check_implicit_insert("add_entry()", i, j)?;
        let build = self.buffers_mut()?;
        let row = &mut build.rows[i];
        let slot = if row.has_base_room() {
            Slot::Base
        } else {
            build.pool.draw(i)?;
            Slot::Overflow
        };
        row.push(j, value, slot);
        self.stage = BuildStage::Building;
        Ok(())
    }

    /// Declare the number of entries of row `i` (random mode).
    pub fn set_row_size(&mut self, i: usize, size: usize) -> Result<(), MatrixError> {
        self.check_random("set_row_size()")?;
        self.stage.require(Capabilities::ROW_SIZES, "set_row_size()")?;
        self.check_row(i)?;
        if size > self.m {
            return Err(MatrixError::param(format!(
                "row {i} cannot hold {size} entries with {} columns",
                self.m
            )));
        }
        self.buffers_mut()?.row_sizes[i] = size;
        Ok(())
    }

    /// Declared size of row `i` (random mode, before compression).
    pub fn row_size(&self, i: usize) -> Result<usize, MatrixError> {
        self.check_random("row_size()")?;
        self.check_row(i)?;
        let build = self.buffers()?;
        Ok(match build.rows.get(i) {
            Some(row) => row.base_capacity(),
            None => build.row_sizes[i],
        })
    }

    /// Finish row size declaration and allocate rows (random mode).
    pub fn end_row_sizes(&mut self) -> Result<(), MatrixError> {
        self.check_random("end_row_sizes()")?;
        if self.stage != BuildStage::Sized {
            return Err(MatrixError::state(format!(
                "end_row_sizes() is not allowed while the matrix is {}",
                self.stage
            )));
        }
        let build = self.buffers_mut()?;
        let total: usize = build.row_sizes.iter().sum();
        if let Some(limit) = build.nnz_limit {
            if total > limit {
                return Err(MatrixError::param(format!(
                    "declared row sizes sum to {total}, exceeding the nonzero count {limit} given to set_size()"
                )));
            }
        }
        build.rows = build.row_sizes.iter().map(|&s| RowBuffer::with_capacity(s)).collect();
        debug!(total, "row sizes fixed");
        self.stage = BuildStage::Building;
        Ok(())
    }

    /// Add column `j` to the pattern of row `i` (random mode). Adding an
    /// index twice is a no-op.
    pub fn add_index(&mut self, i: usize, j: usize) -> Result<(), MatrixError> {
        self.check_random("add_index()")?;
        if self.stage != BuildStage::Building {
            return Err(MatrixError::state(format!(
                "add_index() requires end_row_sizes() first; the matrix is {}",
                self.stage
            )));
        }
        self.check_row(i)?;
        self.check_col(j)?;
        let row = &mut self.buffers_mut()?.rows[i];
        if row.contains(j) {
            return Ok(());
        }
        if !row.has_base_room() {
            return Err(MatrixError::RowFull { row: i, size: row.base_capacity() });
        }
        row.push(j, B::zero(), Slot::Base);
        Ok(())
    }

    /// Finish the pattern (random mode); same as [`BcrsMatrix::compress`].
    pub fn end_indices(&mut self) -> Result<CompressionStatistics, MatrixError> {
        self.check_random("end_indices()")?;
        self.compress()
    }

    /// Sort, merge and compact all rows.
    ///
    /// Runs once per build cycle; a second call is a state error (the first
    /// result stays available via [`BcrsMatrix::compression_statistics`]).
    pub fn compress(&mut self) -> Result<CompressionStatistics, MatrixError> {
        if self.stage == BuildStage::Compressed {
            return Err(MatrixError::state("matrix is already compressed"));
        }
        self.stage.require(Capabilities::COMPRESS, "compress()")?;
        if self.mode == BuildMode::Random && self.stage == BuildStage::Sized {
            return Err(MatrixError::state("end_row_sizes() must be called before compress() in random build mode"));
        }
        let build = self.build.take().ok_or_else(|| missing_buffers(self.stage))?;
        let (storage, stats) = compress_rows(build.rows, build.pool.drawn());
        self.storage = storage;
        self.stats = Some(stats.clone());
        self.stage = BuildStage::Compressed;
        Ok(stats)
    }

    /// Statistics of the last compression.
    pub fn compression_statistics(&self) -> Option<&CompressionStatistics> {
        self.stats.as_ref()
    }

    /// Copy a compressed or empty matrix. Mid-build matrices cannot be copied.
    pub fn try_clone(&self) -> Result<Self, MatrixError> {
        self.require_copyable("cannot copy a matrix that is sized but not compressed")?;
        Ok(Self {
            n: self.n,
            m: self.m,
            mode: self.mode,
            stage: self.stage,
            params: self.params,
            build: None,
            storage: self.storage.clone(),
            stats: self.stats.clone(),
        })
    }

    /// Replace `self` with a copy of `other`. Both must be compressed or empty.
    pub fn assign_from(&mut self, other: &Self) -> Result<(), MatrixError> {
        self.require_copyable("cannot assign into a matrix that is sized but not compressed")?;
        *self = other.try_clone()?;
        Ok(())
    }

    fn require_copyable(&self, msg: &str) -> Result<(), MatrixError> {
        self.stage
            .require(Capabilities::COPY, "copy")
            .map_err(|_| MatrixError::InvalidCopyState(format!("{msg} (matrix is {})", self.stage)))
    }

    /// Release all storage and return to the empty, mode-unset state.
    pub fn reset(&mut self) {
        debug!(n = self.n, m = self.m, "reset matrix");
        *self = Self::default();
    }

    /// Block rows.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Block columns.
    pub fn m(&self) -> usize {
        self.m
    }

    pub fn build_mode(&self) -> BuildMode {
        self.mode
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn is_compressed(&self) -> bool {
        self.stage == BuildStage::Compressed
    }

    /// Stored blocks; zero until compression.
    pub fn nonzeroes(&self) -> usize {
        self.storage.nnz()
    }

    pub fn implicit_parameters(&self) -> Option<ImplicitParameters> {
        self.params
    }

    /// Capacity plan in effect (implicit mode, before compression).
    pub fn capacity_plan(&self) -> Option<CapacityPlan> {
        self.build.as_ref().and_then(|b| b.plan)
    }

    /// Overflow pool (implicit mode, before compression).
    pub fn overflow_pool(&self) -> Option<&OverflowPool> {
        self.build.as_ref().filter(|_| self.mode == BuildMode::Implicit).map(|b| &b.pool)
    }

    fn buffers(&self) -> Result<&BuildBuffers<B>, MatrixError> {
        self.build.as_ref().ok_or_else(|| missing_buffers(self.stage))
    }

    fn buffers_mut(&mut self) -> Result<&mut BuildBuffers<B>, MatrixError> {
        let stage = self.stage;
        self.build.as_mut().ok_or_else(|| missing_buffers(stage))
    }

    fn check_implicit_insert(&self, op: &str, i: usize, j: usize) -> Result<(), MatrixError> {
        self.stage.require(Capabilities::INSERT, op)?;
        if self.mode != BuildMode::Implicit {
            return Err(MatrixError::state(format!("{op} requires implicit build mode, matrix is in {:?} mode", self.mode)));
        }
        self.check_row(i)?;
        self.check_col(j)
    }

    fn check_random(&self, op: &str) -> Result<(), MatrixError> {
        if self.mode != BuildMode::Random {
            return Err(MatrixError::state(format!("{op} requires random build mode, matrix is in {:?} mode", self.mode)));
        }
        Ok(())
    }

    pub(crate) fn check_row(&self, i: usize) -> Result<(), MatrixError> {
        if i >= self.n {
            return Err(MatrixError::IndexOutOfRange { index: i, bound: self.n, axis: "row" });
        }
        Ok(())
    }

    pub(crate) fn check_col(&self, j: usize) -> Result<(), MatrixError> {
        if j >= self.m {
            return Err(MatrixError::IndexOutOfRange { index: j, bound: self.m, axis: "column" });
        }
        Ok(())
    }
}

fn missing_buffers(stage: BuildStage) -> MatrixError {
    MatrixError::state(format!("no build buffers while the matrix is {stage}"))
}
