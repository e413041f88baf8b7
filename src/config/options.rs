//! Capacity parameters for implicit build mode.
//!
//! Implicit assembly does not know the nonzero pattern in advance. Instead the
//! caller declares an estimate of the average number of entries per row and
//! the fraction of additional entries that may spill over into a shared
//! overflow pool. Both values are locked in when the matrix is sized.

use crate::error::MatrixError;

/// Implicit build mode parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplicitParameters {
    /// Expected number of entries per row; each row reserves `ceil(avg)` slots.
    pub average_entries_per_row: f64,

    /// Overflow pool size relative to `N * avg`.
    pub overflow_fraction: f64,
}

impl ImplicitParameters {
    pub const DEFAULT_AVERAGE_ENTRIES_PER_ROW: f64 = 4.0;
    pub const DEFAULT_OVERFLOW_FRACTION: f64 = 0.1;

    /// Construct and validate.
    pub fn new(average_entries_per_row: f64, overflow_fraction: f64) -> Result<Self, MatrixError> {
        let params = Self { average_entries_per_row, overflow_fraction };
        params.validate()?;
        Ok(params)
    }

    /// `avg` must be positive and finite, `overflow` non-negative and finite.
    pub fn validate(&self) -> Result<(), MatrixError> {
        if !(self.average_entries_per_row.is_finite() && self.average_entries_per_row > 0.0) {
            return Err(MatrixError::param(format!(
                "average entries per row must be positive, got {}",
                self.average_entries_per_row
            )));
        }
        if !(self.overflow_fraction.is_finite() && self.overflow_fraction >= 0.0) {
            return Err(MatrixError::param(format!(
                "overflow fraction must be non-negative, got {}",
                self.overflow_fraction
            )));
        }
        Ok(())
    }
}

impl Default for ImplicitParameters {
    fn default() -> Self {
        Self {
            average_entries_per_row: Self::DEFAULT_AVERAGE_ENTRIES_PER_ROW,
            overflow_fraction: Self::DEFAULT_OVERFLOW_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ImplicitParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ImplicitParameters::new(0.0, 0.1).is_err());
        assert!(ImplicitParameters::new(-2.0, 0.1).is_err());
        assert!(ImplicitParameters::new(3.0, -1.0).is_err());
        assert!(ImplicitParameters::new(f64::NAN, 0.0).is_err());
        assert!(ImplicitParameters::new(3.0, 0.0).is_ok());
    }
}
