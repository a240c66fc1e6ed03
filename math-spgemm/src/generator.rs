//! Random sparse matrix generator
//!
//! Produces benchmark inputs with a target fill factor in two phases:
//!
//! 1. **Row sizes**: every row gets a random weight, and row pointers follow
//!    the cumulative share of the requested non-zeros, with each row capped
//!    at the column count. Whatever capping leaves over is absorbed starting
//!    from the last row, so `row_ptrs[rows]` always equals the requested nnz.
//! 2. **Columns and values**: each row takes a random subset of distinct
//!    columns (a prefix of a random permutation), filled in parallel.
//!
//! Every row draws from its own stream derived from `(seed, row)`, so the
//! output does not depend on the number of worker threads.

use crate::error::{Result, SpgemmError};
use crate::parallel::ParallelConfig;
use crate::sparse::{CsrMatrix, GrowBuffer};
use crate::traits::SparseScalar;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random matrix generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Target fraction of non-zero cells (at most 0.5)
    pub fill_factor: f64,
    /// Seed of the random streams
    #[serde(default)]
    pub seed: u64,
    /// Worker configuration for the per-row phase
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fill_factor: 0.01,
            seed: 0,
            parallel: ParallelConfig::default(),
        }
    }
}

/// Generate a random `rows x cols` CSR matrix on the default worker pool.
///
/// Fails with [`SpgemmError::InvalidDensity`] when `fill_factor * rows * cols`
/// exceeds half of the matrix.
pub fn generate<T: SparseScalar>(
    rows: usize,
    cols: usize,
    fill_factor: f64,
    seed: u64,
) -> Result<CsrMatrix<T>> {
    let config = GeneratorConfig {
        fill_factor,
        seed,
        parallel: ParallelConfig::default(),
    };
    CsrMatrix::random(rows, cols, &config)
}

impl<T: SparseScalar> CsrMatrix<T> {
    /// Generate a random sparse matrix, see [`generate`]
    pub fn random(rows: usize, cols: usize, config: &GeneratorConfig) -> Result<Self> {
        let nnz = target_nnz(rows, cols, config.fill_factor)?;
        log::debug!(
            "generating {}x{} matrix with {} non-zeros (seed {})",
            rows,
            cols,
            nnz,
            config.seed
        );

        let mut matrix = CsrMatrix::empty();
        matrix.reserve(rows, nnz)?;
        matrix.set_num_cols(cols);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let sizes = row_sizes(rows, cols, nnz, &mut rng);
        for (row, size) in sizes.into_iter().enumerate() {
            matrix.row_ptrs[row + 1] = matrix.row_ptrs[row] + size;
        }

        let seed = config.seed;
        let row_slices = matrix.rows_mut()?;
        config.parallel.install(move || {
            row_slices.into_par_iter().enumerate().try_for_each_init(
                GrowBuffer::new,
                |perm, (row, (col_slice, val_slice))| {
                    perm.reserve(cols)?;
                    fill_row(&mut perm[..cols], row_seed(seed, row), col_slice, val_slice);
                    Ok::<(), SpgemmError>(())
                },
            )
        })??;

        Ok(matrix)
    }
}

/// Number of non-zeros implied by `fill_factor`, rejecting dense requests
fn target_nnz(rows: usize, cols: usize, fill_factor: f64) -> Result<usize> {
    let total = rows as f64 * cols as f64;
    let limit = (total / 2.0).floor() as usize;

    if !fill_factor.is_finite() || fill_factor < 0.0 {
        return Err(SpgemmError::InvalidDensity {
            fill_factor,
            requested: 0,
            limit,
        });
    }

    let requested = (fill_factor * total).floor();
    if requested > total / 2.0 {
        return Err(SpgemmError::InvalidDensity {
            fill_factor,
            requested: requested as usize,
            limit,
        });
    }

    Ok(requested as usize)
}

/// Split `nnz` across `rows` rows of at most `cols` entries each.
///
/// Row pointers follow the cumulative weight, `floor(nnz * cum_w / sum)`, so
/// rounding losses never pile up in a single row.
fn row_sizes<R: Rng + ?Sized>(rows: usize, cols: usize, nnz: usize, rng: &mut R) -> Vec<usize> {
    let weights: Vec<f64> = (0..rows).map(|_| rng.random::<f64>()).collect();
    let sum: f64 = weights.iter().sum();

    let mut sizes = Vec::with_capacity(rows);
    let mut cumulative = 0.0;
    let mut assigned = 0usize;
    for (row, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        let fraction = if sum > 0.0 {
            cumulative / sum
        } else {
            (row + 1) as f64 / rows as f64
        };
        let target = ((fraction * nnz as f64) as usize).min(nnz);
        let size = target.saturating_sub(assigned).min(cols);
        assigned += size;
        sizes.push(size);
    }

    // Only capped rows and float rounding leave a remainder here.
    // nnz <= rows * cols / 2, so there is always room for it
    let mut residual = nnz - assigned;
    for size in sizes.iter_mut().rev() {
        if residual == 0 {
            break;
        }
        let take = (cols - *size).min(residual);
        *size += take;
        residual -= take;
    }

    sizes
}

/// Seed of the random stream owned by `row`
fn row_seed(seed: u64, row: usize) -> u64 {
    // splitmix64 finalizer
    let stride = (row as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut z = seed.wrapping_add(stride);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Fill one row with distinct random columns and values in `(0, 1]`
fn fill_row<T: SparseScalar>(
    perm: &mut [usize],
    seed: u64,
    col_slice: &mut [usize],
    val_slice: &mut [T],
) {
    let mut rng = StdRng::seed_from_u64(seed);

    for (i, slot) in perm.iter_mut().enumerate() {
        *slot = i;
    }
    let (chosen, _) = perm.partial_shuffle(&mut rng, col_slice.len());
    col_slice.copy_from_slice(chosen);

    for val in val_slice.iter_mut() {
        *val = T::from_f64_lossy(1.0 - rng.random::<f64>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_matrix_is_valid() {
        let m: CsrMatrix<f32> = generate(200, 150, 0.05, 42).unwrap();

        assert!(m.validate().is_ok());
        assert_eq!(m.num_rows(), 200);
        assert_eq!(m.num_cols(), 150);
        assert_eq!(m.nnz(), 1500);
        assert_eq!(m.row_ptrs()[0], 0);
        assert!(m.row_ptrs().windows(2).all(|w| w[0] <= w[1]));
        assert!(m.has_unique_columns());
    }

    #[test]
    fn test_values_are_nonzero() {
        let m: CsrMatrix<f64> = generate(50, 40, 0.1, 7).unwrap();
        assert!(m.values().iter().all(|&v| v > 0.0 && v <= 1.0));
    }

    #[test]
    fn test_density_rejected() {
        let err = generate::<f32>(10, 10, 0.9, 0).unwrap_err();
        assert!(err.is_density_error());
        match err {
            SpgemmError::InvalidDensity {
                requested, limit, ..
            } => {
                assert_eq!(requested, 90);
                assert_eq!(limit, 50);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_half_density_accepted() {
        let m: CsrMatrix<f64> = generate(10, 10, 0.5, 3).unwrap();
        assert_eq!(m.nnz(), 50);
        assert!(m.has_unique_columns());
    }

    #[test]
    fn test_invalid_fill_factor_rejected() {
        assert!(generate::<f64>(10, 10, -0.1, 0).unwrap_err().is_density_error());
        assert!(generate::<f64>(10, 10, f64::NAN, 0).unwrap_err().is_density_error());
    }

    #[test]
    fn test_zero_rows() {
        let m: CsrMatrix<f32> = generate(0, 10, 0.1, 1).unwrap();
        assert_eq!(m.num_rows(), 0);
        assert_eq!(m.nnz(), 0);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_single_nonzero() {
        let m: CsrMatrix<f64> = generate(2, 2, 0.25, 11).unwrap();
        assert_eq!(m.nnz(), 1);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_same_seed_any_thread_count() {
        let mut config = GeneratorConfig {
            fill_factor: 0.02,
            seed: 1234,
            parallel: ParallelConfig::with_threads(1),
        };
        let one: CsrMatrix<f32> = CsrMatrix::random(300, 200, &config).unwrap();

        config.parallel = ParallelConfig::with_threads(4);
        let four: CsrMatrix<f32> = CsrMatrix::random(300, 200, &config).unwrap();

        assert_eq!(one, four);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a: CsrMatrix<f32> = generate(100, 100, 0.05, 1).unwrap();
        let b: CsrMatrix<f32> = generate(100, 100, 0.05, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_row_sizes_respect_column_cap() {
        let mut rng = StdRng::seed_from_u64(5);
        // A dense-ish request forces clamping and redistribution
        let sizes = row_sizes(4, 3, 6, &mut rng);

        assert_eq!(sizes.iter().sum::<usize>(), 6);
        assert!(sizes.iter().all(|&s| s <= 3));
    }

    #[test]
    fn test_rows_stay_near_mean_at_low_density() {
        // About one entry per row on a wide matrix
        let m: CsrMatrix<f32> = generate(5000, 2000, 0.0005, 7).unwrap();
        assert!(m.validate().is_ok());
        assert!(m.nnz() >= 4999);

        let max_row = (0..m.num_rows()).map(|r| m.row_range(r).len()).max().unwrap();
        let last_row = m.row_range(m.num_rows() - 1).len();
        assert!(max_row <= 4, "max_row = {max_row}");
        assert!(last_row <= 4, "last_row = {last_row}");
    }

    #[test]
    fn test_row_sizes_follow_cumulative_share() {
        let mut rng = StdRng::seed_from_u64(9);
        let sizes = row_sizes(1000, 1000, 10_000, &mut rng);

        assert_eq!(sizes.iter().sum::<usize>(), 10_000);
        // Mean is 10; a weight is at most twice the mean weight
        assert!(sizes.iter().all(|&s| s <= 25), "{:?}", sizes.iter().max());
    }

    #[test]
    fn test_allocation_failure_reported() {
        let err = generate::<f32>(1 << 60, 1, 0.0, 0).unwrap_err();
        assert!(err.is_allocation_error());

        // A permutation buffer sized by the column count fails the same way
        let err = generate::<f32>(1, 1 << 60, 0.0, 0).unwrap_err();
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_row_seed_distinct() {
        assert_ne!(row_seed(0, 0), row_seed(0, 1));
        assert_ne!(row_seed(0, 0), row_seed(1, 0));
    }
}
