//! Row-major square dense matrix.

use rand::Rng;

use crate::error::{MatrixError, Result};

/// An n×n matrix of `f64` stored row-major in one contiguous buffer.
///
/// Element (i, j) lives at `data[i * n + j]`, so each row is a contiguous
/// slice. The SIMD kernel relies on this for its vector loads.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// All-zero n×n matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Identity matrix of order n.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Fills an n×n matrix with values drawn uniformly from [0, 1).
    ///
    /// Pass a seeded RNG for reproducible inputs.
    pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let data = (0..n * n).map(|_| rng.random::<f64>()).collect();
        Self { n, data }
    }

    /// Same as [`generate`](Self::generate) using the thread-local RNG.
    pub fn random(n: usize) -> Self {
        Self::generate(n, &mut rand::rng())
    }

    /// Wraps a row-major buffer of length n*n.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(MatrixError::VectorLength {
                what: "dense data",
                expected: n * n,
                got: data.len(),
            });
        }
        Ok(Self { n, data })
    }

    /// Matrix order (number of rows, equal to number of columns).
    pub fn n(&self) -> usize {
        self.n
    }

    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for order {}", self.n);
        self.data[i * self.n + j]
    }

    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for order {}", self.n);
        self.data[i * self.n + j] = value;
    }

    /// Row `i` as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Both operands of a dense product must have the same order.
pub(crate) fn check_same_order(a: &DenseMatrix, b: &DenseMatrix) -> Result<usize> {
    if a.n != b.n {
        return Err(MatrixError::DimensionMismatch {
            left: a.n,
            right: b.n,
        });
    }
    Ok(a.n)
}
