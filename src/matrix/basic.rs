use tracing::instrument;

use super::dense::{DenseMatrix, check_same_order};
use crate::error::Result;

/// Reference matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop. Each `C[i][j]` is summed into a local
/// accumulator in k order `0..n` and stored once. Every other dense variant
/// is checked against this result.
///
/// The innermost loop walks B with stride `n`, so it is slow on large
/// matrices. Use it as the correctness baseline, not for performance.
#[instrument(level = "debug", skip_all, fields(n = a.n()))]
pub fn multiply_basic(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_same_order(a, b)?;
    let mut c = DenseMatrix::zeros(n);
    multiply_rows(a.as_slice(), b.as_slice(), c.as_mut_slice(), n, 0);
    Ok(c)
}

/// Computes rows `first_row..first_row + c_rows.len() / n` of A*B into
/// `c_rows`, which holds exactly those rows.
///
/// Shared with the row-parallel variant so a single worker produces
/// bit-identical output to [`multiply_basic`].
pub(crate) fn multiply_rows(a: &[f64], b: &[f64], c_rows: &mut [f64], n: usize, first_row: usize) {
    if n == 0 {
        return;
    }
    for (r, c_row) in c_rows.chunks_exact_mut(n).enumerate() {
        let a_row = &a[(first_row + r) * n..(first_row + r + 1) * n];
        for (j, c_ij) in c_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (p, &a_ip) in a_row.iter().enumerate() {
                sum += a_ip * b[p * n + j];
            }
            *c_ij = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;

    #[test]
    fn two_by_two() {
        let a = DenseMatrix::from_vec(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = DenseMatrix::from_vec(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = multiply_basic(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn empty_matrix() {
        let c = multiply_basic(&DenseMatrix::zeros(0), &DenseMatrix::zeros(0)).unwrap();
        assert_eq!(c.n(), 0);
    }

    #[test]
    fn order_mismatch() {
        let err = multiply_basic(&DenseMatrix::zeros(2), &DenseMatrix::zeros(3)).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { left: 2, right: 3 }));
    }
}
