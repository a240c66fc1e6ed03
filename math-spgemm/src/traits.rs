//! Scalar abstraction for sparse matrix entries
//!
//! [`SparseScalar`] is implemented for `f32` (the storage type of the
//! benchmark inputs) and `f64` (used by the dense reference checks).

use num_traits::{Float, NumAssign};
use std::fmt::{Debug, Display};

/// Trait for real scalar types stored in a [`CsrMatrix`](crate::CsrMatrix).
///
/// `Default` must be the additive zero; the grow buffers rely on it to fill
/// freshly reserved slots.
pub trait SparseScalar:
    Float + NumAssign + Default + Send + Sync + Debug + Display + 'static
{
    /// Convert a value drawn by the generator into this type
    fn from_f64_lossy(value: f64) -> Self;

    /// Widen to `f64` for reporting and dense comparisons
    fn to_f64_lossy(self) -> f64;
}

impl SparseScalar for f64 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl SparseScalar for f32 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        assert_eq!(f32::default(), 0.0);
        assert_eq!(f64::default(), 0.0);
    }

    #[test]
    fn test_lossy_conversions() {
        assert_eq!(f32::from_f64_lossy(0.5), 0.5_f32);
        assert_eq!(0.25_f32.to_f64_lossy(), 0.25);
        assert_eq!(f64::from_f64_lossy(1.5).to_f64_lossy(), 1.5);
    }
}
