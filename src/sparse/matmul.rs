//! Sparse × sparse product.

use tracing::instrument;

use super::csr::CsrMatrix;
use crate::error::{MatrixError, Result};

/// `C = A * B` for CSR operands, with `A.cols() == B.rows()`.
///
/// Row i of C is built by scattering `A[i][k] * B[k][j]` into a dense
/// accumulator indexed by j, visiting A's row entries in storage order and,
/// for each, B's row entries in storage order. That is the same summation
/// order as scanning every (i, j) pair directly.
///
/// A column is stored only if its sum is non-zero: exact cancellation
/// (including `-0.0`) is pruned, tiny non-zero sums are kept. Columns are
/// emitted in ascending order.
#[instrument(level = "debug", skip_all, fields(m = a.rows(), k = a.cols(), n = b.cols()))]
pub fn csr_matmul(a: &CsrMatrix, b: &CsrMatrix) -> Result<CsrMatrix> {
    if a.cols() != b.rows() {
        return Err(MatrixError::CsrShapeMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }

    let (m, n) = (a.rows(), b.cols());
    // Grows as needed; the a.nnz * b.nnz worst case is never reserved.
    let mut c = CsrMatrix::with_capacity(m, n, a.nnz().max(b.nnz()))?;

    let mut acc = vec![0.0f64; n];
    let mut touched = vec![false; n];
    let mut cols_in_row: Vec<usize> = Vec::new();

    for i in 0..m {
        let (a_cols, a_vals) = a.row(i);
        for (&k, &a_ik) in a_cols.iter().zip(a_vals) {
            let (b_cols, b_vals) = b.row(k);
            for (&j, &b_kj) in b_cols.iter().zip(b_vals) {
                if !touched[j] {
                    touched[j] = true;
                    cols_in_row.push(j);
                }
                acc[j] += a_ik * b_kj;
            }
        }

        cols_in_row.sort_unstable();
        for &j in &cols_in_row {
            if acc[j] != 0.0 {
                c.push_entry(j, acc[j]);
            }
            acc[j] = 0.0;
            touched[j] = false;
        }
        cols_in_row.clear();
        c.seal_row(i);
    }

    c.shrink_to_fit();
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_cancellation_is_pruned() {
        // A = [1 1], B = [1; -1] -> C = [0], nothing stored.
        let a = CsrMatrix::from_raw_parts(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0]).unwrap();
        let b = CsrMatrix::from_raw_parts(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, -1.0]).unwrap();
        let c = csr_matmul(&a, &b).unwrap();
        assert_eq!(c.nnz(), 0);
        assert_eq!(c.row_ptr(), &[0, 0]);
    }

    #[test]
    fn near_cancellation_is_kept() {
        let a = CsrMatrix::from_raw_parts(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0]).unwrap();
        let b = CsrMatrix::from_raw_parts(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, -(1.0 - 1e-15)])
            .unwrap();
        let c = csr_matmul(&a, &b).unwrap();
        assert_eq!(c.nnz(), 1);
        assert!(c.values()[0] > 0.0);
    }

    #[test]
    fn nan_sums_are_kept() {
        // inf * 0 = NaN, which is not equal to zero.
        let a = CsrMatrix::from_raw_parts(1, 1, vec![0, 1], vec![0], vec![f64::INFINITY]).unwrap();
        let b = CsrMatrix::from_raw_parts(1, 1, vec![0, 1], vec![0], vec![0.0]).unwrap();
        let c = csr_matmul(&a, &b).unwrap();
        assert_eq!(c.nnz(), 1);
        assert_eq!(c.row(0).0, &[0]);
        assert!(c.values()[0].is_nan());
    }

    #[test]
    fn columns_come_out_sorted() {
        // Row of A hits B rows whose columns arrive as 2, 0, 1.
        let a = CsrMatrix::from_raw_parts(1, 2, vec![0, 2], vec![1, 0], vec![1.0, 1.0]).unwrap();
        let b = CsrMatrix::from_raw_parts(2, 3, vec![0, 1, 3], vec![1, 2, 0], vec![4.0, 5.0, 6.0])
            .unwrap();
        let c = csr_matmul(&a, &b).unwrap();
        assert_eq!(c.row(0), (&[0, 1, 2][..], &[6.0, 4.0, 5.0][..]));
    }
}
