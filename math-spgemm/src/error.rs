//! Error types for sparse matrix generation and multiplication.
//!
//! Every fallible operation in the crate returns [`Result`], so allocation
//! failures and broken CSR invariants surface to the caller instead of
//! aborting the process.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur while building, validating or multiplying CSR matrices.
#[derive(Debug, Error)]
pub enum SpgemmError {
    /// The requested fill factor does not describe a sparse matrix.
    #[error(
        "invalid density: fill factor {fill_factor} asks for {requested} non-zeros, at most {limit} allowed"
    )]
    InvalidDensity {
        /// The requested fill factor
        fill_factor: f64,
        /// Number of non-zeros implied by the fill factor
        requested: usize,
        /// Largest number of non-zeros still considered sparse
        limit: usize,
    },

    /// Growing a buffer could not be satisfied by the allocator.
    #[error("allocation failed: could not grow buffer to {requested} elements")]
    AllocationFailed {
        /// Number of elements the buffer was asked to hold
        requested: usize,
        /// Underlying allocator error
        #[source]
        source: TryReserveError,
    },

    /// A CSR invariant does not hold.
    #[error("structural violation: {detail}")]
    StructuralViolation {
        /// Description of the broken invariant
        detail: String,
    },

    /// The inner dimensions of `A` and `Bt` disagree.
    #[error("dimension mismatch: A has {left_cols} columns, Bt has {right_cols} columns")]
    DimensionMismatch {
        /// Column count of the left matrix
        left_cols: usize,
        /// Column count of the transposed right matrix
        right_cols: usize,
    },

    /// A dedicated worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized `Result` type for sparse matrix operations.
pub type Result<T> = std::result::Result<T, SpgemmError>;

impl SpgemmError {
    pub(crate) fn structural(detail: impl Into<String>) -> Self {
        SpgemmError::StructuralViolation {
            detail: detail.into(),
        }
    }

    /// Returns `true` if this is a density rejection from the generator.
    pub fn is_density_error(&self) -> bool {
        matches!(self, SpgemmError::InvalidDensity { .. })
    }

    /// Returns `true` if memory growth failed.
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, SpgemmError::AllocationFailed { .. })
    }

    /// Returns `true` if the error reports a broken matrix invariant.
    ///
    /// This includes `StructuralViolation` and `DimensionMismatch`.
    pub fn is_structural_error(&self) -> bool {
        matches!(
            self,
            SpgemmError::StructuralViolation { .. } | SpgemmError::DimensionMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpgemmError::InvalidDensity {
            fill_factor: 0.9,
            requested: 90,
            limit: 50,
        };
        assert_eq!(
            err.to_string(),
            "invalid density: fill factor 0.9 asks for 90 non-zeros, at most 50 allowed"
        );
    }

    #[test]
    fn test_structural_display() {
        let err = SpgemmError::structural("row_ptrs[0] is 3");
        assert_eq!(err.to_string(), "structural violation: row_ptrs[0] is 3");
    }

    #[test]
    fn test_is_allocation_error() {
        let source = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let alloc_err = SpgemmError::AllocationFailed {
            requested: usize::MAX,
            source,
        };
        let density_err = SpgemmError::InvalidDensity {
            fill_factor: 0.6,
            requested: 6,
            limit: 5,
        };

        assert!(alloc_err.is_allocation_error());
        assert!(!density_err.is_allocation_error());
        assert!(density_err.is_density_error());
    }

    #[test]
    fn test_is_structural_error() {
        let dim_err = SpgemmError::DimensionMismatch {
            left_cols: 3,
            right_cols: 4,
        };
        let density_err = SpgemmError::InvalidDensity {
            fill_factor: 0.6,
            requested: 6,
            limit: 5,
        };

        assert!(dim_err.is_structural_error());
        assert!(SpgemmError::structural("bad").is_structural_error());
        assert!(!density_err.is_structural_error());
    }
}
