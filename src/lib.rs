//! bcrs-assembly: block compressed row storage with implicit assembly
//!
//! This crate assembles sparse matrices whose nonzero pattern is not known in
//! advance. Entries are inserted in any order and multiplicity into
//! over-provisioned row buffers backed by a shared overflow pool; a single
//! `compress()` sorts, merges duplicates and compacts the rows into contiguous
//! storage ready for row iteration, element lookup and mat-vec products.

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;

// Re-exports for convenience
pub use self::config::*;
pub use self::core::*;
pub use self::error::*;
pub use self::matrix::*;
