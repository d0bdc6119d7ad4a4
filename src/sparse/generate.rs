use rand::Rng;

use super::csr::CsrMatrix;
use crate::error::{MatrixError, Result};

/// Random rows×cols CSR matrix where each cell is stored with probability
/// `1 - sparsity`.
///
/// Stored values are uniform in (0, 1], so no entry is zero. Cells are
/// visited row-major, so columns are ascending within each row.
pub fn generate_sparse<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    sparsity: f64,
    rng: &mut R,
) -> Result<CsrMatrix> {
    if !(0.0..=1.0).contains(&sparsity) {
        return Err(MatrixError::InvalidSparsity(sparsity));
    }

    let estimate = ((1.0 - sparsity) * rows.saturating_mul(cols) as f64) as usize;
    let mut m = CsrMatrix::with_capacity(rows, cols, estimate)?;
    for i in 0..rows {
        for j in 0..cols {
            if rng.random::<f64>() >= sparsity {
                m.push_entry(j, 1.0 - rng.random::<f64>());
            }
        }
        m.seal_row(i);
    }
    m.shrink_to_fit();
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn extremes() {
        let mut rng = SmallRng::seed_from_u64(3);
        let full = generate_sparse(4, 5, 0.0, &mut rng).unwrap();
        assert_eq!(full.nnz(), 20);
        assert!(full.values().iter().all(|&v| v > 0.0 && v <= 1.0));

        let empty = generate_sparse(4, 5, 1.0, &mut rng).unwrap();
        assert_eq!(empty.nnz(), 0);
        assert_eq!(empty.row_ptr(), &[0; 5]);
    }

    #[test]
    fn density_is_roughly_respected() {
        let m = generate_sparse(100, 100, 0.9, &mut SmallRng::seed_from_u64(11)).unwrap();
        assert!((500..1500).contains(&m.nnz()), "nnz = {}", m.nnz());
        for i in 0..m.rows() {
            let (cols, _) = m.row(i);
            assert!(cols.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn oversized_shape_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            generate_sparse(usize::MAX, 2, 1.0, &mut rng),
            Err(MatrixError::InvalidCsr(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_sparsity() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            generate_sparse(2, 2, 1.5, &mut rng),
            Err(MatrixError::InvalidSparsity(_))
        ));
        assert!(generate_sparse(2, 2, f64::NAN, &mut rng).is_err());
    }
}
