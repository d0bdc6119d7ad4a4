//! Sparse matrix–vector product.

use tracing::instrument;

use super::csr::CsrMatrix;
use crate::error::{MatrixError, Result};
use crate::threaded::pool::{run_row_bands, worker_count};

/// `y = A * x`.
///
/// `x` must have `A.cols()` elements and `y` must have `A.rows()`. Every
/// element of `y` is overwritten; empty rows give 0.
#[instrument(level = "debug", skip_all, fields(rows = a.rows(), nnz = a.nnz()))]
pub fn spmv(a: &CsrMatrix, x: &[f64], y: &mut [f64]) -> Result<()> {
    check_vectors(a, x, y)?;
    for (i, y_i) in y.iter_mut().enumerate() {
        *y_i = row_dot(a, i, x);
    }
    Ok(())
}

/// Multi-threaded [`spmv`]: `y` is split into contiguous row bands, one per
/// worker.
#[instrument(level = "debug", skip_all, fields(rows = a.rows(), nnz = a.nnz(), threads = threads))]
pub fn spmv_parallel(a: &CsrMatrix, x: &[f64], y: &mut [f64], threads: usize) -> Result<()> {
    check_vectors(a, x, y)?;
    let workers = worker_count(threads, a.rows())?;
    run_row_bands(y, 1, workers, |rows, band| {
        for (i, y_i) in rows.zip(band.iter_mut()) {
            *y_i = row_dot(a, i, x);
        }
    });
    Ok(())
}

#[inline]
fn row_dot(a: &CsrMatrix, i: usize, x: &[f64]) -> f64 {
    let (cols, vals) = a.row(i);
    let mut sum = 0.0;
    for (&c, &v) in cols.iter().zip(vals) {
        sum += v * x[c];
    }
    sum
}

fn check_vectors(a: &CsrMatrix, x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != a.cols() {
        return Err(MatrixError::VectorLength {
            what: "x",
            expected: a.cols(),
            got: x.len(),
        });
    }
    if y.len() != a.rows() {
        return Err(MatrixError::VectorLength {
            what: "y",
            expected: a.rows(),
            got: y.len(),
        });
    }
    Ok(())
}
