//! Dense and sparse matrix multiplication kernels, built from scratch.
//!
//! The dense side goes from the textbook triple loop to cache tiling,
//! AVX2 dot products, and thread-parallel row and tile splits. Every variant
//! returns a fresh n×n product that matches the reference loop up to
//! floating-point summation order. The sparse side is CSR storage with SpMV,
//! sparse × sparse multiplication, and a loader for the coordinate text
//! format.
//!
//! ## Usage
//!
//! ```
//! use matkern::{DenseMatrix, MultiplyConfig, Variant, multiply};
//!
//! let a = DenseMatrix::identity(64);
//! let b = DenseMatrix::random(64);
//!
//! let c = multiply(Variant::ParallelBlocked, &a, &b, &MultiplyConfig::default()).unwrap();
//! assert_eq!(c, b);
//! ```
//!
//! Sparse matrices:
//!
//! ```
//! use matkern::sparse::{CsrMatrix, matmul::csr_matmul, spmv::spmv};
//!
//! let a = CsrMatrix::identity(3);
//! let mut y = vec![0.0; 3];
//! spmv(&a, &[1.0, 2.0, 3.0], &mut y).unwrap();
//! assert_eq!(y, [1.0, 2.0, 3.0]);
//!
//! let c = csr_matmul(&a, &a).unwrap();
//! assert_eq!(c.nnz(), 3);
//! ```
//!
//! ## What's inside
//!
//! - i-j-k reference loop and cube-tiled loop
//! - AVX2 4-lane dot products with a bit-identical scalar fallback
//! - Row-band and tile-run multi-threading with single-writer output
//! - CSR SpMV, sparse × sparse product, text loader

pub mod blocked;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod sparse;
pub mod threaded;

pub use blocked::simd::{multiply_simd, multiply_simd_transposed};
pub use blocked::tiled::{DEFAULT_BLOCK_SIZE, multiply_blocked};
pub use error::{MatrixError, Result};
pub use kernels::{Capabilities, DotKernel};
pub use matrix::basic::multiply_basic;
pub use matrix::dense::DenseMatrix;
pub use matrix::transpose::transpose;
pub use sparse::CsrMatrix;
pub use threaded::rows::multiply_parallel_rows;
pub use threaded::tiles::multiply_parallel_blocked;

/// Tuning knobs shared by the dense variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyConfig {
    /// Tile side for the blocked variants.
    pub block_size: usize,
    /// Worker count for the parallel variants.
    pub threads: usize,
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            threads: Capabilities::get().cores,
        }
    }
}

impl MultiplyConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// A dense multiplication strategy. All variants compute the same product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Basic,
    Blocked,
    Simd,
    ParallelRows,
    ParallelBlocked,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Basic,
        Variant::Blocked,
        Variant::Simd,
        Variant::ParallelRows,
        Variant::ParallelBlocked,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Basic => "Basic",
            Variant::Blocked => "Blocked",
            Variant::Simd => "SIMD",
            Variant::ParallelRows => "Parallel_Rows",
            Variant::ParallelBlocked => "Parallel_Blocked",
        }
    }
}

/// Matrix multiply: `C = A * B` with the chosen variant.
///
/// A and B must have the same order. The SIMD variant transposes B
/// internally and frees the transpose before returning.
pub fn multiply(variant: Variant, a: &DenseMatrix, b: &DenseMatrix, config: &MultiplyConfig) -> Result<DenseMatrix> {
    match variant {
        Variant::Basic => multiply_basic(a, b),
        Variant::Blocked => multiply_blocked(a, b, config.block_size),
        Variant::Simd => multiply_simd(a, b),
        Variant::ParallelRows => multiply_parallel_rows(a, b, config.threads),
        Variant::ParallelBlocked => multiply_parallel_blocked(a, b, config.block_size, config.threads),
    }
}
