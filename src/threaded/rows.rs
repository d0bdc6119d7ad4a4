//! Row-parallel reference multiply.

use tracing::instrument;

use super::pool::{run_row_bands, worker_count};
use crate::error::Result;
use crate::matrix::basic::multiply_rows;
use crate::matrix::dense::{DenseMatrix, check_same_order};

/// Multi-threaded version of the reference i-j-k multiply.
///
/// Rows of C are split into contiguous bands, one per worker, and each
/// worker runs the reference loop on its own band. A and B are shared
/// read-only. Every cell is written once by one worker, so with
/// `threads == 1` (or any thread count) the output is bit-identical to
/// [`multiply_basic`](crate::matrix::basic::multiply_basic).
///
/// # Arguments
///
/// * `threads` - Maximum workers (fewer are used when n is smaller)
#[instrument(level = "debug", skip_all, fields(n = a.n(), threads = threads))]
pub fn multiply_parallel_rows(a: &DenseMatrix, b: &DenseMatrix, threads: usize) -> Result<DenseMatrix> {
    let n = check_same_order(a, b)?;
    let workers = worker_count(threads, n)?;

    let mut c = DenseMatrix::zeros(n);
    let (a, b) = (a.as_slice(), b.as_slice());
    run_row_bands(c.as_mut_slice(), n, workers, |rows, band| {
        multiply_rows(a, b, band, n, rows.start);
    });
    Ok(c)
}
