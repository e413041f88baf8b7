//! Build modes and the lifecycle stages of a matrix.

use std::fmt;

use bitflags::bitflags;

use crate::error::MatrixError;

/// How the sparsity pattern is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Not chosen yet.
    #[default]
    Unset,
    /// Pattern discovered by `entry()` calls; storage planned from an average degree.
    Implicit,
    /// Row sizes declared first, then column indices added in any order.
    Random,
}

/// Lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStage {
    /// Created empty, no dimensions.
    #[default]
    Unsized,
    /// Dimensions fixed, nothing inserted.
    Sized,
    /// Entries (implicit) or indices (random) are being inserted.
    Building,
    /// Structure compacted and frozen.
    Compressed,
}

bitflags! {
    /// Operations a stage admits.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        const CONFIGURE = 0b0000_0001; // build mode and implicit parameters
        const RESIZE    = 0b0000_0010;
        const ROW_SIZES = 0b0000_0100; // random mode row size declaration
        const INSERT    = 0b0000_1000;
        const COMPRESS  = 0b0001_0000;
        const ACCESS    = 0b0010_0000; // indexed access and arithmetic
        const COPY      = 0b0100_0000;
        const BUILD     = Self::INSERT.bits() | Self::COMPRESS.bits();
    }
}

impl BuildStage {
    pub fn capabilities(self) -> Capabilities {
        match self {
            BuildStage::Unsized => Capabilities::CONFIGURE | Capabilities::RESIZE | Capabilities::COPY,
            BuildStage::Sized => Capabilities::RESIZE | Capabilities::ROW_SIZES | Capabilities::BUILD,
            BuildStage::Building => Capabilities::BUILD,
            BuildStage::Compressed => Capabilities::ACCESS | Capabilities::COPY,
        }
    }

    /// Fail with a state error naming `op` unless this stage admits `cap`.
    pub(crate) fn require(self, cap: Capabilities, op: &str) -> Result<(), MatrixError> {
        if self.capabilities().contains(cap) {
            Ok(())
        } else {
            Err(MatrixError::state(format!("{op} is not allowed while the matrix is {self}")))
        }
    }

    /// Sized or building, but not compressed.
    pub fn is_mid_build(self) -> bool {
        matches!(self, BuildStage::Sized | BuildStage::Building)
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStage::Unsized => "unsized",
            BuildStage::Sized => "sized",
            BuildStage::Building => "being built",
            BuildStage::Compressed => "compressed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_stage_only_admits_access_and_copy() {
        let caps = BuildStage::Compressed.capabilities();
        assert!(caps.contains(Capabilities::ACCESS));
        assert!(!caps.intersects(Capabilities::BUILD | Capabilities::RESIZE));
        assert!(BuildStage::Compressed.require(Capabilities::INSERT, "entry()").is_err());
    }

    #[test]
    fn configure_only_before_sizing() {
        assert!(BuildStage::Unsized.require(Capabilities::CONFIGURE, "configure").is_ok());
        for stage in [BuildStage::Sized, BuildStage::Building, BuildStage::Compressed] {
            assert!(stage.require(Capabilities::CONFIGURE, "configure").is_err());
        }
    }

    #[test]
    fn copy_only_outside_a_build() {
        let copyable: Vec<_> = [BuildStage::Unsized, BuildStage::Sized, BuildStage::Building, BuildStage::Compressed]
            .into_iter()
            .filter(|s| s.capabilities().contains(Capabilities::COPY))
            .collect();
        assert_eq!(copyable, vec![BuildStage::Unsized, BuildStage::Compressed]);
    }
}
