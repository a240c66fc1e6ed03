//! Sparse matrix structures (CSR format)
//!
//! This module provides the Compressed Sparse Row (CSR) container and the
//! grow-only buffers backing it.

mod buffer;
mod csr;

pub use buffer::GrowBuffer;
pub use csr::CsrMatrix;
