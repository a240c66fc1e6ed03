//! Per-block sparse product kernel
//!
//! A block is a contiguous range of rows of `A`. Each row is scattered into a
//! dense accumulator of length `A.cols`, then dotted against every row of
//! `Bt`. The cost of one dot product is proportional to the number of
//! non-zeros in the `Bt` row, never to the column count.

use crate::error::{Result, SpgemmError};
use crate::sparse::{CsrMatrix, GrowBuffer};
use crate::traits::SparseScalar;
use std::ops::Range;

/// Output slots reserved per block row before the first doubling
const INITIAL_ENTRIES_PER_ROW: usize = 10;

/// Partial product of one row block
#[derive(Debug, Clone)]
pub struct BlockProduct<T> {
    /// Rows of `A` covered by this block
    pub rows: Range<usize>,
    /// `rows.len() x Bt.rows` product with block-local row pointers
    pub matrix: CsrMatrix<T>,
}

impl<T: SparseScalar> BlockProduct<T> {
    /// Number of non-zeros produced by the block
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }
}

/// Multiply rows `rows` of `a` with the transposed right-hand matrix `bt`.
///
/// An entry is stored iff its dot product is exactly non-zero; exact
/// cancellations are dropped. `a` and `bt` must be valid, which
/// [`multiply`](super::multiply) checks once before dispatching blocks.
///
/// Fails with [`SpgemmError::DimensionMismatch`] when the column counts
/// differ and with [`SpgemmError::StructuralViolation`] when `rows` is not a
/// range of rows of `a`.
pub fn multiply_block<T: SparseScalar>(
    a: &CsrMatrix<T>,
    bt: &CsrMatrix<T>,
    rows: Range<usize>,
) -> Result<BlockProduct<T>> {
    if a.num_cols() != bt.num_cols() {
        return Err(SpgemmError::DimensionMismatch {
            left_cols: a.num_cols(),
            right_cols: bt.num_cols(),
        });
    }
    if rows.start > rows.end || rows.end > a.num_rows() {
        return Err(SpgemmError::structural(format!(
            "block rows {:?} out of range for a matrix with {} rows",
            rows,
            a.num_rows()
        )));
    }

    let block_rows = rows.len();
    let mut out = CsrMatrix::empty();
    out.reserve(block_rows, block_rows.saturating_mul(INITIAL_ENTRIES_PER_ROW))?;
    out.set_num_cols(bt.num_rows());

    let a_cols = a.col_indices();
    let a_vals = a.values();
    let bt_ptrs = bt.row_ptrs();
    let bt_cols = bt.col_indices();
    let bt_vals = bt.values();

    let mut accumulator: GrowBuffer<T> = GrowBuffer::with_len(a.num_cols())?;
    let mut nnz = 0usize;

    for (local, row) in rows.clone().enumerate() {
        let range = a.row_range(row);

        if !range.is_empty() {
            for k in range.clone() {
                accumulator[a_cols[k]] = a_vals[k];
            }

            for c in 0..bt.num_rows() {
                let mut sum = T::zero();
                for k in bt_ptrs[c]..bt_ptrs[c + 1] {
                    sum += accumulator[bt_cols[k]] * bt_vals[k];
                }

                if sum != T::zero() {
                    out.col_indices.put(nnz, c)?;
                    out.values.put(nnz, sum)?;
                    nnz += 1;
                }
            }

            // Only the scattered positions are dirty
            for k in range {
                accumulator[a_cols[k]] = T::zero();
            }
        }

        out.row_ptrs[local + 1] = nnz;
    }

    Ok(BlockProduct { rows, matrix: out })
}
