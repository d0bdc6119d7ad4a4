//! Cache-tiled dense multiply.

use tracing::instrument;

use crate::error::{MatrixError, Result};
use crate::matrix::dense::{DenseMatrix, check_same_order};

/// Tile side used when the caller has no tuned value.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Cache-blocked matrix multiplication.
///
/// Splits the i/j/k index space into cubes of side `block_size` (the last
/// cube in each dimension is clipped to n). For every (ii, jj) tile the
/// kk cubes are visited in order and each cube's partial dot product is
/// added into C, so every cell collects one contribution per kk cube.
///
/// Matches [`multiply_basic`](crate::matrix::basic::multiply_basic) up to
/// summation-order rounding. With `block_size >= n` there is a single kk
/// cube and the result is the same as the reference.
#[instrument(level = "debug", skip_all, fields(n = a.n(), block_size = block_size))]
pub fn multiply_blocked(a: &DenseMatrix, b: &DenseMatrix, block_size: usize) -> Result<DenseMatrix> {
    let n = check_same_order(a, b)?;
    if block_size == 0 {
        return Err(MatrixError::InvalidBlockSize);
    }

    let mut c = DenseMatrix::zeros(n);
    let (a, b) = (a.as_slice(), b.as_slice());
    let out = c.as_mut_slice();

    for ii in (0..n).step_by(block_size) {
        for jj in (0..n).step_by(block_size) {
            accumulate_tile(a, b, n, block_size, ii, jj, |idx, sum| out[idx] += sum);
        }
    }
    Ok(c)
}

/// Runs the full kk accumulation for the output tile whose top-left corner
/// is (ii, jj).
///
/// `add(idx, partial)` is called once per cell per kk cube with the flat
/// row-major index of the cell. Cells outside this tile are never touched.
#[inline]
#[allow(clippy::too_many_arguments)]
pub(crate) fn accumulate_tile<F>(
    a: &[f64],
    b: &[f64],
    n: usize,
    block_size: usize,
    ii: usize,
    jj: usize,
    mut add: F,
) where
    F: FnMut(usize, f64),
{
    let i_end = (ii + block_size).min(n);
    let j_end = (jj + block_size).min(n);

    for kk in (0..n).step_by(block_size) {
        let k_end = (kk + block_size).min(n);

        for i in ii..i_end {
            let a_row = &a[i * n + kk..i * n + k_end];
            for j in jj..j_end {
                let mut sum = 0.0;
                for (p, &a_ip) in a_row.iter().enumerate() {
                    sum += a_ip * b[(kk + p) * n + j];
                }
                add(i * n + j, sum);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_block_size_is_rejected() {
        let m = DenseMatrix::identity(3);
        assert!(matches!(
            multiply_blocked(&m, &m, 0),
            Err(MatrixError::InvalidBlockSize)
        ));
    }

    #[test]
    fn tile_touches_only_its_cells() {
        let n = 5;
        let a = vec![1.0; n * n];
        let b = vec![1.0; n * n];
        let mut c = vec![0.0; n * n];
        accumulate_tile(&a, &b, n, 2, 2, 4, |idx, s| c[idx] += s);

        for i in 0..n {
            for j in 0..n {
                let inside = (2..4).contains(&i) && j == 4;
                let expected = if inside { n as f64 } else { 0.0 };
                assert_eq!(c[i * n + j], expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn small_blocks_sum_every_kk_cube() {
        let a = DenseMatrix::from_vec(3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        let c = multiply_blocked(&a, &DenseMatrix::identity(3), 1).unwrap();
        assert_eq!(c, a);
    }
}
