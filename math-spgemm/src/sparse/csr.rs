//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts
//!
//! The three arrays live in [`GrowBuffer`]s, so a matrix can be reserved once
//! and filled incrementally. Storage may be larger than the logical size;
//! the accessors only expose the first `nnz` entries.

use super::buffer::GrowBuffer;
use crate::error::{Result, SpgemmError};
use crate::traits::SparseScalar;
use ndarray::Array2;
use std::ops::Range;

/// Compressed Sparse Row (CSR) matrix format
///
/// A matrix moves through `empty -> reserved -> populated -> finalized`:
/// [`CsrMatrix::reserve`] may be called again while populating, but storage
/// never shrinks.
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    /// Number of rows
    pub(crate) num_rows: usize,
    /// Number of columns
    pub(crate) num_cols: usize,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub(crate) row_ptrs: GrowBuffer<usize>,
    /// Column indices for each value
    pub(crate) col_indices: GrowBuffer<usize>,
    /// Non-zero values in row-major order
    pub(crate) values: GrowBuffer<T>,
}

impl<T: SparseScalar> CsrMatrix<T> {
    /// Create a matrix with no rows, no columns and no storage
    pub fn empty() -> Self {
        Self {
            num_rows: 0,
            num_cols: 0,
            row_ptrs: GrowBuffer::new(),
            col_indices: GrowBuffer::new(),
            values: GrowBuffer::new(),
        }
    }

    /// Create an all-zero `num_rows x num_cols` matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            row_ptrs: GrowBuffer::from(vec![0; num_rows + 1]),
            col_indices: GrowBuffer::new(),
            values: GrowBuffer::new(),
        }
    }

    /// Create a CSR matrix from raw components
    ///
    /// Fails with [`SpgemmError::StructuralViolation`] if the arrays are
    /// inconsistent or break a CSR invariant.
    pub fn from_raw_parts(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptrs.len() != num_rows + 1 {
            return Err(SpgemmError::structural(format!(
                "row_ptrs has {} elements, expected {}",
                row_ptrs.len(),
                num_rows + 1
            )));
        }
        if col_indices.len() != values.len() {
            return Err(SpgemmError::structural(format!(
                "col_indices has {} elements but values has {}",
                col_indices.len(),
                values.len()
            )));
        }
        if row_ptrs[num_rows] != values.len() {
            return Err(SpgemmError::structural(format!(
                "row_ptrs[{}] is {}, expected nnz = {}",
                num_rows,
                row_ptrs[num_rows],
                values.len()
            )));
        }

        let matrix = Self {
            num_rows,
            num_cols,
            row_ptrs: GrowBuffer::from(row_ptrs),
            col_indices: GrowBuffer::from(col_indices),
            values: GrowBuffer::from(values),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            row_ptrs: GrowBuffer::from(row_ptrs),
            col_indices: GrowBuffer::from(col_indices),
            values: GrowBuffer::from(values),
        }
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            row_ptrs: GrowBuffer::from((0..=n).collect::<Vec<_>>()),
            col_indices: GrowBuffer::from((0..n).collect::<Vec<_>>()),
            values: GrowBuffer::from(vec![T::one(); n]),
        }
    }

    /// Reserve space for more rows or non-zeros.
    ///
    /// Row pointer storage grows to `num_rows + 1` slots and index/value
    /// storage to at least `nnz` slots. Existing contents are preserved and
    /// smaller requests never shrink anything. Freshly reserved row pointers
    /// are zero, so the first reservation leaves `row_ptrs[0] == 0`.
    pub fn reserve(&mut self, num_rows: usize, nnz: usize) -> Result<()> {
        self.row_ptrs.reserve(num_rows + 1)?;
        self.col_indices.reserve(nnz)?;
        self.values.reserve(nnz)?;
        self.num_rows = self.num_rows.max(num_rows);
        Ok(())
    }

    pub(crate) fn set_num_cols(&mut self, num_cols: usize) {
        self.num_cols = num_cols;
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.row_ptrs.get(self.num_rows).copied().unwrap_or(0)
    }

    /// Sparsity ratio (fraction of non-zero entries)
    pub fn sparsity(&self) -> f64 {
        let total = self.num_rows * self.num_cols;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Row pointer array (`num_rows + 1` entries once reserved)
    pub fn row_ptrs(&self) -> &[usize] {
        let len = (self.num_rows + 1).min(self.row_ptrs.len());
        &self.row_ptrs[..len]
    }

    /// Column indices of the stored entries
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices[..self.nnz().min(self.col_indices.len())]
    }

    /// Values of the stored entries
    pub fn values(&self) -> &[T] {
        &self.values[..self.nnz().min(self.values.len())]
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row_entries(i)
            .find(|&(col, _)| col == j)
            .map(|(_, val)| val)
            .unwrap_or_else(T::zero)
    }

    /// Check the structural invariants of the matrix.
    ///
    /// `row_ptrs` must start at zero, be non-decreasing and end at an nnz
    /// that the index/value storage can hold; every column index must be
    /// smaller than `num_cols`.
    pub fn validate(&self) -> Result<()> {
        if self.num_rows == 0 && self.row_ptrs.is_empty() {
            return Ok(());
        }
        if self.row_ptrs.len() < self.num_rows + 1 {
            return Err(SpgemmError::structural(format!(
                "row pointer storage holds {} slots, {} rows need {}",
                self.row_ptrs.len(),
                self.num_rows,
                self.num_rows + 1
            )));
        }
        if self.row_ptrs[0] != 0 {
            return Err(SpgemmError::structural(format!(
                "row_ptrs[0] is {}, expected 0",
                self.row_ptrs[0]
            )));
        }
        for row in 0..self.num_rows {
            if self.row_ptrs[row] > self.row_ptrs[row + 1] {
                return Err(SpgemmError::structural(format!(
                    "row_ptrs decreases at row {}: {} > {}",
                    row,
                    self.row_ptrs[row],
                    self.row_ptrs[row + 1]
                )));
            }
        }

        let nnz = self.row_ptrs[self.num_rows];
        let storage = self.col_indices.len().min(self.values.len());
        if nnz > storage {
            return Err(SpgemmError::structural(format!(
                "nnz is {} but index/value storage holds {}",
                nnz, storage
            )));
        }

        if let Some(pos) = self.col_indices[..nnz]
            .iter()
            .position(|&col| col >= self.num_cols)
        {
            return Err(SpgemmError::structural(format!(
                "col_indices[{}] is {}, matrix has {} columns",
                pos, self.col_indices[pos], self.num_cols
            )));
        }

        Ok(())
    }

    /// `true` when no row stores the same column twice
    ///
    /// Column indices outside `0..num_cols` count as a failure.
    pub fn has_unique_columns(&self) -> bool {
        // stamp[col] holds the last row (+1) that used `col`
        let mut stamp = vec![0usize; self.num_cols];
        for row in 0..self.num_rows {
            for &col in &self.col_indices[self.row_range(row)] {
                match stamp.get_mut(col) {
                    Some(seen) if *seen == row + 1 => return false,
                    Some(seen) => *seen = row + 1,
                    None => return false,
                }
            }
        }
        true
    }

    /// `true` when column indices are strictly increasing within every row
    pub fn is_row_sorted(&self) -> bool {
        (0..self.num_rows).all(|row| {
            self.col_indices[self.row_range(row)]
                .windows(2)
                .all(|pair| pair[0] < pair[1])
        })
    }

    /// Short `NAME<rows, cols, nnz>` summary
    pub fn info(&self, name: &str) -> String {
        let name = if name.is_empty() { "CSR" } else { name };
        format!(
            "{}<{}, {}, {}>",
            name,
            self.num_rows,
            self.num_cols,
            self.nnz()
        )
    }

    /// Transpose into a new CSR matrix.
    ///
    /// Rows of the result come out sorted by column.
    pub fn transpose(&self) -> Result<Self> {
        let nnz = self.nnz();
        let mut out = Self::empty();
        out.reserve(self.num_cols, nnz)?;
        out.set_num_cols(self.num_rows);

        // Count entries per output row, then prefix-sum into row pointers
        for &col in self.col_indices() {
            out.row_ptrs[col + 1] += 1;
        }
        for row in 0..self.num_cols {
            out.row_ptrs[row + 1] += out.row_ptrs[row];
        }

        let mut next = out.row_ptrs[..self.num_cols].to_vec();
        for row in 0..self.num_rows {
            for (col, val) in self.row_entries(row) {
                let dst = next[col];
                out.col_indices[dst] = row;
                out.values[dst] = val;
                next[col] += 1;
            }
        }

        Ok(out)
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        for i in 0..self.num_rows {
            for (j, val) in self.row_entries(i) {
                dense[[i, j]] = val;
            }
        }

        dense
    }

    /// Split index/value storage into one mutable slice pair per row.
    ///
    /// The row pointers must already be finalized and validated.
    pub(crate) fn rows_mut(&mut self) -> Result<Vec<(&mut [usize], &mut [T])>> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(self.num_rows)
            .map_err(|source| SpgemmError::AllocationFailed {
                requested: self.num_rows,
                source,
            })?;

        let nnz = self.nnz();
        let mut cols_rest = &mut self.col_indices[..nnz];
        let mut vals_rest = &mut self.values[..nnz];

        for row in 0..self.num_rows {
            let len = self.row_ptrs[row + 1] - self.row_ptrs[row];
            let (cols, cols_tail) = std::mem::take(&mut cols_rest).split_at_mut(len);
            let (vals, vals_tail) = std::mem::take(&mut vals_rest).split_at_mut(len);
            cols_rest = cols_tail;
            vals_rest = vals_tail;
            rows.push((cols, vals));
        }

        Ok(rows)
    }
}

impl<T: SparseScalar> Default for CsrMatrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Matrices compare by their logical contents; spare capacity is ignored.
impl<T: SparseScalar> PartialEq for CsrMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows
            && self.num_cols == other.num_cols
            && self.row_ptrs() == other.row_ptrs()
            && self.col_indices() == other.col_indices()
            && self.values() == other.values()
    }
}
