//! Matrix module: block sparse storage, its build state machine and the
//! compression engine.

pub mod access;
pub mod arith;
pub mod bcrs;
pub mod block;
pub mod build_mode;
pub mod builder;
pub mod capacity;
pub mod compress;
pub mod row_buffer;
pub mod sparse;

pub use access::{RowMut, RowRef};
pub use bcrs::BcrsMatrix;
pub use block::{Block, DenseBlock};
pub use build_mode::{BuildMode, BuildStage, Capabilities};
pub use builder::{BuilderRow, ImplicitMatrixBuilder};
pub use capacity::{CapacityPlan, CapacityPlanner, OverflowPool};
pub use compress::{CompactStorage, CompressionStatistics};
pub use sparse::CsrMatrix;
