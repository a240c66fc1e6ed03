//! Concatenation of block products into the final matrix
//!
//! Runs on the calling thread once every block has finished.

use super::block::BlockProduct;
use crate::error::{Result, SpgemmError};
use crate::sparse::CsrMatrix;
use crate::traits::SparseScalar;

/// Assemble `num_rows x num_cols` from block products given in row order.
///
/// Block-local row pointers are shifted by the number of entries written
/// before the block; indices and values are copied verbatim. The blocks must
/// tile `0..num_rows` without gaps or overlaps.
pub fn merge_blocks<T: SparseScalar>(
    blocks: Vec<BlockProduct<T>>,
    num_rows: usize,
    num_cols: usize,
) -> Result<CsrMatrix<T>> {
    let total_nnz: usize = blocks.iter().map(BlockProduct::nnz).sum();

    let mut out = CsrMatrix::empty();
    out.reserve(num_rows, total_nnz)?;
    out.set_num_cols(num_cols);

    let mut base_row = 0usize;
    let mut base_nnz = 0usize;
    for block in blocks {
        let local = &block.matrix;
        if block.rows.start != base_row || local.num_rows() != block.rows.len() {
            return Err(SpgemmError::structural(format!(
                "block covering rows {:?} does not continue at row {}",
                block.rows, base_row
            )));
        }
        if block.rows.end > num_rows || local.num_cols() != num_cols {
            return Err(SpgemmError::structural(format!(
                "block covering rows {:?} with {} columns does not fit a {}x{} result",
                block.rows,
                local.num_cols(),
                num_rows,
                num_cols
            )));
        }

        let local_ptrs = local.row_ptrs();
        for i in 1..local_ptrs.len() {
            out.row_ptrs[base_row + i] = local_ptrs[i] + base_nnz;
        }

        let n = local.nnz();
        out.col_indices[base_nnz..base_nnz + n].copy_from_slice(local.col_indices());
        out.values[base_nnz..base_nnz + n].copy_from_slice(local.values());

        base_row += local.num_rows();
        base_nnz += n;
    }

    if base_row != num_rows {
        return Err(SpgemmError::structural(format!(
            "blocks cover {} of {} rows",
            base_row, num_rows
        )));
    }

    log::trace!("merged {} rows, {} non-zeros", num_rows, total_nnz);
    Ok(out)
}
