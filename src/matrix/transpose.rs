use tracing::instrument;

use super::dense::DenseMatrix;

/// Transpose a matrix: returns `src^T`.
///
/// After transpose, what was column j of `src` becomes row j of the result,
/// so a column of B can be read as one contiguous slice. The result is a
/// separate allocation owned by the caller.
///
/// # Example
///
/// ```
/// use matkern::matrix::dense::DenseMatrix;
/// use matkern::matrix::transpose::transpose;
///
/// let src = DenseMatrix::from_vec(2, vec![1.0, 2.0,
///                                         3.0, 4.0]).unwrap();
///
/// let dst = transpose(&src);
///
/// assert_eq!(dst.as_slice(), &[1.0, 3.0,
///                              2.0, 4.0]);
/// ```
#[instrument(level = "debug", skip_all, fields(n = src.n()))]
pub fn transpose(src: &DenseMatrix) -> DenseMatrix {
    let n = src.n();
    let mut dst = DenseMatrix::zeros(n);
    transpose_into(src.as_slice(), dst.as_mut_slice(), n, n);
    dst
}

/// Converts from row-major (rows × cols) to row-major (cols × rows).
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols), row-major
/// * `dst` - Destination matrix (cols × rows), row-major
pub(crate) fn transpose_into(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}
