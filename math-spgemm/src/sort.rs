//! Per-row column sorting
//!
//! Reorders the (column, value) pairs of every row into ascending column
//! order. Rows are independent, so each one is sorted as its own task.

use crate::error::{Result, SpgemmError};
use crate::parallel::ParallelConfig;
use crate::sparse::{CsrMatrix, GrowBuffer};
use crate::traits::SparseScalar;
use rayon::prelude::*;

/// Sort the entries of every row by column index.
///
/// The matrix is validated first. A row holding more entries than the matrix
/// has columns cannot have unique columns and is rejected before anything is
/// reordered, which also bounds the per-worker scratch buffer by `num_cols`.
pub fn sort_rows<T: SparseScalar>(
    matrix: &mut CsrMatrix<T>,
    config: &ParallelConfig,
) -> Result<()> {
    matrix.validate()?;

    let num_cols = matrix.num_cols();
    if let Some(row) = (0..matrix.num_rows()).find(|&row| matrix.row_range(row).len() > num_cols)
    {
        return Err(SpgemmError::structural(format!(
            "row {} holds {} entries but the matrix has only {} columns",
            row,
            matrix.row_range(row).len(),
            num_cols
        )));
    }

    log::debug!("sorting {} rows", matrix.num_rows());
    let rows = matrix.rows_mut()?;
    config.install(move || {
        rows.into_par_iter()
            .try_for_each_init(GrowBuffer::new, |scratch, (cols, vals)| {
                sort_row(scratch, cols, vals)
            })
    })?
}

fn sort_row<T: SparseScalar>(
    scratch: &mut GrowBuffer<(usize, T)>,
    cols: &mut [usize],
    vals: &mut [T],
) -> Result<()> {
    if cols.len() < 2 || cols.windows(2).all(|w| w[0] < w[1]) {
        return Ok(());
    }

    scratch.reserve(cols.len())?;
    let pairs = &mut scratch[..cols.len()];
    for (pair, (&col, &val)) in pairs.iter_mut().zip(cols.iter().zip(vals.iter())) {
        *pair = (col, val);
    }
    pairs.sort_unstable_by_key(|&(col, _)| col);

    for (i, &(col, val)) in pairs.iter().enumerate() {
        cols[i] = col;
        vals[i] = val;
    }
    Ok(())
}

impl<T: SparseScalar> CsrMatrix<T> {
    /// Sort every row by column index, see [`sort_rows`]
    pub fn sort_rows(&mut self, config: &ParallelConfig) -> Result<()> {
        sort_rows(self, config)
    }
}
