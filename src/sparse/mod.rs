//! Compressed sparse row matrices and their kernels.
//!
//! - `csr`: storage, invariants, and conversions
//! - `spmv`: sparse matrix–vector product (sequential and row-parallel)
//! - `matmul`: sparse × sparse product with zero pruning
//! - `mtx`: text-format loader
//! - `generate`: random sparse matrices for benchmarking

pub mod csr;
pub mod generate;
pub mod matmul;
pub mod mtx;
pub mod spmv;

pub use csr::CsrMatrix;
