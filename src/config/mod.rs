//! Build configuration for implicit-mode assembly.

pub mod options;
pub use options::ImplicitParameters;
