//! Block-parallel sparse matrix multiplication
//!
//! This crate multiplies sparse matrices stored in Compressed Sparse Row
//! (CSR) form and generates random sparse inputs for benchmarking.
//!
//! # Features
//!
//! - **CSR container**: grow-only storage with fallible allocation and
//!   structural validation
//! - **Random generator**: seeded, thread-count independent, no duplicate
//!   columns within a row
//! - **Row sorting**: per-row column ordering, one parallel task per row
//! - **Multiplication**: `A * B` from `A` and `Bt`, partitioned into row blocks
//!   computed in parallel and merged in row order
//!
//! # Example
//!
//! ```
//! use math_spgemm::{MultiplyConfig, generate, sort_and_multiply};
//!
//! let a = generate::<f32>(200, 100, 0.02, 1)?;
//! let mut bt = generate::<f32>(150, 100, 0.02, 2)?;
//!
//! let c = sort_and_multiply(&a, &mut bt, &MultiplyConfig::default())?;
//! assert_eq!(c.num_rows(), 200);
//! assert_eq!(c.num_cols(), 150);
//! # Ok::<(), math_spgemm::SpgemmError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod multiply;
pub mod parallel;
pub mod sort;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use config::BenchConfig;
pub use error::{Result, SpgemmError};
pub use generator::{GeneratorConfig, generate};
pub use multiply::{
    BlockProduct, MultiplyConfig, merge_blocks, multiply, multiply_block, sort_and_multiply,
};
pub use parallel::ParallelConfig;
pub use sort::sort_rows;
pub use sparse::{CsrMatrix, GrowBuffer};
pub use traits::SparseScalar;
