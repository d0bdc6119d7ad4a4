//! SIMD matmul over a pre-transposed B.
//!
//! With B transposed, column j of B is row j of `bt`, so every output cell is
//! a dot product of two contiguous rows. No packing or blocking is done.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::kernels::Capabilities;
use crate::kernels::dot::{DotKernel, dot_scalar};
use crate::matrix::dense::{DenseMatrix, check_same_order};
use crate::matrix::transpose::transpose;

/// `C = A * B` given `bt = B^T`, using the kernel picked by the capability
/// probe.
#[instrument(level = "debug", skip_all, fields(n = a.n()))]
pub fn multiply_simd_transposed(a: &DenseMatrix, bt: &DenseMatrix) -> Result<DenseMatrix> {
    multiply_simd_transposed_with(a, bt, Capabilities::get().dot)
}

/// Same as [`multiply_simd_transposed`] with an explicit dot kernel.
///
/// An unsupported kernel falls back to [`DotKernel::Scalar`], which returns
/// bit-identical results.
pub fn multiply_simd_transposed_with(
    a: &DenseMatrix,
    bt: &DenseMatrix,
    kernel: DotKernel,
) -> Result<DenseMatrix> {
    let n = check_same_order(a, bt)?;
    let kernel = if kernel.is_supported() {
        kernel
    } else {
        debug!(requested = kernel.name(), "kernel unsupported, using scalar");
        DotKernel::Scalar
    };

    let mut c = DenseMatrix::zeros(n);
    match kernel {
        #[cfg(target_arch = "x86_64")]
        DotKernel::Avx2 => unsafe {
            multiply_rows_avx2(a.as_slice(), bt.as_slice(), c.as_mut_slice(), n)
        },
        _ => multiply_rows_scalar(a.as_slice(), bt.as_slice(), c.as_mut_slice(), n),
    }
    Ok(c)
}

/// Transposes `b`, multiplies, and drops the transpose before returning.
pub fn multiply_simd(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    check_same_order(a, b)?;
    let bt = transpose(b);
    multiply_simd_transposed(a, &bt)
}

fn multiply_rows_scalar(a: &[f64], bt: &[f64], c: &mut [f64], n: usize) {
    if n == 0 {
        return;
    }
    for (a_row, c_row) in a.chunks_exact(n).zip(c.chunks_exact_mut(n)) {
        for (bt_row, c_ij) in bt.chunks_exact(n).zip(c_row.iter_mut()) {
            *c_ij = dot_scalar(a_row, bt_row);
        }
    }
}

/// # Safety
///
/// Caller must ensure the CPU supports AVX2 and all slices hold n*n values.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn multiply_rows_avx2(a: &[f64], bt: &[f64], c: &mut [f64], n: usize) {
    use crate::kernels::dot::dot_avx2;

    if n == 0 {
        return;
    }
    for (a_row, c_row) in a.chunks_exact(n).zip(c.chunks_exact_mut(n)) {
        for (bt_row, c_ij) in bt.chunks_exact(n).zip(c_row.iter_mut()) {
            *c_ij = dot_avx2(a_row, bt_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_detected_kernels_agree_bitwise() {
        for n in [1, 3, 4, 7, 9] {
            let a = DenseMatrix::from_vec(n, (0..n * n).map(|i| (i % 5) as f64 * 0.3).collect()).unwrap();
            let b = DenseMatrix::from_vec(n, (0..n * n).map(|i| (i % 7) as f64 * 1.1).collect()).unwrap();
            let bt = transpose(&b);

            let fast = multiply_simd_transposed(&a, &bt).unwrap();
            let scalar = multiply_simd_transposed_with(&a, &bt, DotKernel::Scalar).unwrap();
            assert_eq!(fast, scalar, "n = {n}");
        }
    }

    #[test]
    fn known_product() {
        let a = DenseMatrix::from_vec(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = DenseMatrix::from_vec(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = multiply_simd(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }
}
