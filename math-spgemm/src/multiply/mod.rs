//! Block-parallel sparse matrix multiplication
//!
//! Computes `C = A * B` from `A` (`r x n`) and `Bt` (`c x n`), the transpose
//! of `B`, so that every output entry is a sparse row-row dot product.
//!
//! The rows of `A` are split into contiguous blocks. Blocks are multiplied
//! independently on the worker pool, each into its own private CSR matrix,
//! and then concatenated by a single-threaded merge once all of them have
//! joined. The result does not depend on the block size or thread count.
//!
//! # Example
//!
//! ```
//! use math_spgemm::{CsrMatrix, MultiplyConfig, multiply};
//! use ndarray::array;
//!
//! let a = CsrMatrix::from_dense(&array![[1.0_f64, 0.0], [0.0, 2.0]], 0.0);
//! let bt = CsrMatrix::from_dense(&array![[3.0_f64, 0.0], [0.0, 4.0]], 0.0);
//!
//! let c = multiply(&a, &bt, &MultiplyConfig::default()).unwrap();
//! assert_eq!(c.to_dense(), array![[3.0, 0.0], [0.0, 8.0]]);
//! ```

mod block;
mod merge;

pub use block::{BlockProduct, multiply_block};
pub use merge::merge_blocks;

use crate::error::{Result, SpgemmError};
use crate::parallel::ParallelConfig;
use crate::sort::sort_rows;
use crate::sparse::CsrMatrix;
use crate::traits::SparseScalar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Fraction of `A`'s rows per block when no block size is given
pub const DEFAULT_BLOCK_FRACTION: f64 = 0.01;

/// Multiplication configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiplyConfig {
    /// Rows of `A` per block (None = 1% of the rows, at least one)
    #[serde(default)]
    pub block_size: Option<usize>,
    /// Worker configuration for the block phase
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl MultiplyConfig {
    /// Block size used for a left matrix with `num_rows` rows
    pub fn block_size_for(&self, num_rows: usize) -> usize {
        self.block_size
            .unwrap_or((DEFAULT_BLOCK_FRACTION * num_rows as f64) as usize)
            .max(1)
    }
}

/// Multiply `a` by the matrix whose transpose is `bt`.
///
/// Both inputs are read-only and validated first; their column counts must
/// agree. The result has `a.num_rows()` rows and `bt.num_rows()` columns,
/// with column indices ascending in every row. Any failure in a block aborts
/// the whole multiplication.
pub fn multiply<T: SparseScalar>(
    a: &CsrMatrix<T>,
    bt: &CsrMatrix<T>,
    config: &MultiplyConfig,
) -> Result<CsrMatrix<T>> {
    if a.num_cols() != bt.num_cols() {
        return Err(SpgemmError::DimensionMismatch {
            left_cols: a.num_cols(),
            right_cols: bt.num_cols(),
        });
    }
    a.validate()?;
    bt.validate()?;

    let num_rows = a.num_rows();
    let block_size = config.block_size_for(num_rows);
    let block_count = num_rows.div_ceil(block_size);
    log::debug!(
        "multiplying {} by {}^T: {} blocks of {} rows on {} threads",
        a.info("A"),
        bt.info("Bt"),
        block_count,
        block_size,
        config.parallel.effective_threads()
    );

    let blocks = config.parallel.install(|| {
        (0..block_count)
            .into_par_iter()
            .map(|block| {
                let start = block * block_size;
                let end = (start + block_size).min(num_rows);
                multiply_block(a, bt, start..end)
            })
            .collect::<Result<Vec<_>>>()
    })??;

    let total_nnz: usize = blocks.iter().map(BlockProduct::nnz).sum();
    log::debug!("{} blocks produced {} non-zeros", blocks.len(), total_nnz);

    merge_blocks(blocks, num_rows, bt.num_rows())
}

/// Sort the rows of `bt`, then multiply, like the benchmark pipeline does
pub fn sort_and_multiply<T: SparseScalar>(
    a: &CsrMatrix<T>,
    bt: &mut CsrMatrix<T>,
    config: &MultiplyConfig,
) -> Result<CsrMatrix<T>> {
    sort_rows(bt, &config.parallel)?;
    multiply(a, bt, config)
}
