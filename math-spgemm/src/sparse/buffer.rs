//! Grow-only owned storage for CSR arrays
//!
//! All slots of a [`GrowBuffer`] are initialized, so reserving space is the
//! same as making it addressable. The buffer never shrinks and growth keeps
//! every previously written element.

use crate::error::{Result, SpgemmError};
use std::ops::{Deref, DerefMut};

/// Owning, grow-only buffer with fallible allocation
#[derive(Debug, Clone, PartialEq)]
pub struct GrowBuffer<T> {
    data: Vec<T>,
}

impl<T: Copy + Default> GrowBuffer<T> {
    /// Create an empty buffer without allocating
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer with `len` default-initialized slots
    pub fn with_len(len: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.reserve(len)?;
        Ok(buffer)
    }

    /// Ensure at least `min_len` slots are addressable.
    ///
    /// Requests smaller than the current length are no-ops.
    pub fn reserve(&mut self, min_len: usize) -> Result<()> {
        let current = self.data.len();
        if min_len <= current {
            return Ok(());
        }

        self.data
            .try_reserve_exact(min_len - current)
            .map_err(|source| SpgemmError::AllocationFailed {
                requested: min_len,
                source,
            })?;
        self.data.resize(min_len, T::default());
        Ok(())
    }

    /// Make `index` addressable, doubling the length when it has to grow
    #[inline]
    pub fn grow_for(&mut self, index: usize) -> Result<()> {
        if index < self.data.len() {
            return Ok(());
        }
        let doubled = self.data.len().saturating_mul(2);
        self.reserve(doubled.max(index + 1))
    }

    /// Write `value` at `index`, growing the buffer first if needed
    #[inline]
    pub fn put(&mut self, index: usize, value: T) -> Result<()> {
        self.grow_for(index)?;
        self.data[index] = value;
        Ok(())
    }

    /// Number of addressable slots
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when no slot has been reserved yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the buffer, keeping the first `len` slots
    pub fn into_vec(mut self, len: usize) -> Vec<T> {
        self.data.truncate(len);
        self.data
    }
}

impl<T: Copy + Default> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for GrowBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> Deref for GrowBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for GrowBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let buffer: GrowBuffer<u32> = GrowBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_reserve_preserves_contents() {
        let mut buffer = GrowBuffer::with_len(3).unwrap();
        buffer[0] = 7usize;
        buffer[2] = 9;

        buffer.reserve(10).unwrap();

        assert_eq!(buffer.len(), 10);
        assert_eq!(&buffer[..3], &[7, 0, 9]);
        assert!(buffer[3..].iter().all(|&x| x == 0));
    }

    #[test]
    fn test_reserve_never_shrinks() {
        let mut buffer: GrowBuffer<f32> = GrowBuffer::with_len(8).unwrap();
        buffer.reserve(2).unwrap();
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_grow_for_doubles() {
        let mut buffer: GrowBuffer<u8> = GrowBuffer::with_len(4).unwrap();
        buffer.grow_for(4).unwrap();
        assert_eq!(buffer.len(), 8);

        // A far index jumps straight past the doubled length
        buffer.grow_for(100).unwrap();
        assert_eq!(buffer.len(), 101);
    }

    #[test]
    fn test_put_grows_from_empty() {
        let mut buffer = GrowBuffer::new();
        buffer.put(0, 1.5_f64).unwrap();
        buffer.put(1, 2.5).unwrap();
        buffer.put(2, 3.5).unwrap();

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.into_vec(3), vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_impossible_reserve_reports_allocation_failure() {
        let mut buffer: GrowBuffer<u64> = GrowBuffer::new();
        let err = buffer.reserve(usize::MAX).unwrap_err();
        assert!(err.is_allocation_error());
        assert!(buffer.is_empty());
    }
}
