use approx::relative_eq;
use matkern::blocked::simd::multiply_simd_transposed_with;
use matkern::{
    DEFAULT_BLOCK_SIZE, DenseMatrix, DotKernel, MatrixError, MultiplyConfig, Variant, multiply,
    multiply_basic, multiply_blocked, multiply_parallel_blocked, multiply_parallel_rows, multiply_simd,
    multiply_simd_transposed, transpose,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn assert_matrices_close(expected: &DenseMatrix, actual: &DenseMatrix, name: &str) {
    assert_eq!(expected.n(), actual.n(), "{}: order mismatch", name);
    for (i, (e, a)) in expected.as_slice().iter().zip(actual.as_slice()).enumerate() {
        assert!(
            relative_eq!(*e, *a, epsilon = 1e-12, max_relative = 1e-9),
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            e,
            a
        );
    }
}

fn random_pair(n: usize, seed: u64) -> (DenseMatrix, DenseMatrix) {
    let mut rng = SmallRng::seed_from_u64(seed);
    (DenseMatrix::generate(n, &mut rng), DenseMatrix::generate(n, &mut rng))
}

fn all_variants(a: &DenseMatrix, b: &DenseMatrix, config: &MultiplyConfig) -> Vec<(&'static str, DenseMatrix)> {
    Variant::ALL
        .iter()
        .map(|&v| (v.name(), multiply(v, a, b, config).unwrap()))
        .collect()
}

// ============================================================
// Every variant against the reference loop
// ============================================================

#[test]
fn test_variants_match_basic() {
    for n in [1, 2, 3, 50] {
        let (a, b) = random_pair(n, n as u64);
        let expected = multiply_basic(&a, &b).unwrap();

        let config = MultiplyConfig::default().with_block_size(16).with_threads(4);
        for (name, c) in all_variants(&a, &b, &config) {
            assert_matrices_close(&expected, &c, &format!("{}_n{}", name, n));
        }
    }
}

#[test]
fn test_2x2_known_values() {
    let a = DenseMatrix::from_vec(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = DenseMatrix::from_vec(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();

    let c = multiply_basic(&a, &b).unwrap();
    assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);

    for (name, c_fast) in all_variants(&a, &b, &MultiplyConfig::default()) {
        assert_matrices_close(&c, &c_fast, name);
    }
}

// ============================================================
// Identity
// ============================================================

#[test]
fn test_identity_on_either_side() {
    for n in [1, 5, 33] {
        let (m, _) = random_pair(n, 99);
        let id = DenseMatrix::identity(n);
        let config = MultiplyConfig::default().with_block_size(8).with_threads(3);

        for (name, c) in all_variants(&m, &id, &config) {
            assert_matrices_close(&m, &c, &format!("{}_right_identity_n{}", name, n));
        }
        for (name, c) in all_variants(&id, &m, &config) {
            assert_matrices_close(&m, &c, &format!("{}_left_identity_n{}", name, n));
        }
    }
}

// ============================================================
// Tile boundary tests
// ============================================================

#[test]
fn test_blocked_tile_boundaries() {
    let block_sizes = [1, 2, 3, 4, 7, 8, 16];
    for n in [3, 4, 5, 7, 8, 9, 15, 16, 17] {
        let (a, b) = random_pair(n, 7);
        let expected = multiply_basic(&a, &b).unwrap();
        for bs in block_sizes {
            let c = multiply_blocked(&a, &b, bs).unwrap();
            assert_matrices_close(&expected, &c, &format!("blocked_n{}_bs{}", n, bs));

            let c = multiply_parallel_blocked(&a, &b, bs, 4).unwrap();
            assert_matrices_close(&expected, &c, &format!("parallel_blocked_n{}_bs{}", n, bs));
        }
    }
}

#[test]
fn test_blocked_with_block_at_least_n() {
    for n in [1, 10, 50] {
        let (a, b) = random_pair(n, 5);
        let expected = multiply_basic(&a, &b).unwrap();
        for bs in [n, n + 1, DEFAULT_BLOCK_SIZE.max(n)] {
            let c = multiply_blocked(&a, &b, bs).unwrap();
            assert_matrices_close(&expected, &c, &format!("single_tile_n{}_bs{}", n, bs));
        }
    }
}

// ============================================================
// SIMD kernel
// ============================================================

#[test]
fn test_simd_lane_remainders() {
    // n mod 4 = 0, 1, 2, 3
    for n in [4, 5, 6, 7, 8, 13] {
        let (a, b) = random_pair(n, 21);
        let expected = multiply_basic(&a, &b).unwrap();
        let bt = transpose(&b);

        let c = multiply_simd_transposed(&a, &bt).unwrap();
        assert_matrices_close(&expected, &c, &format!("simd_n{}", n));
    }
}

#[test]
fn test_simd_fallback_is_equivalent() {
    for n in [1, 3, 4, 9, 50] {
        let (a, b) = random_pair(n, 8);
        let bt = transpose(&b);

        let scalar = multiply_simd_transposed_with(&a, &bt, DotKernel::Scalar).unwrap();
        let avx2 = multiply_simd_transposed_with(&a, &bt, DotKernel::Avx2).unwrap();
        assert_eq!(scalar, avx2, "fallback diverged at n = {}", n);
        assert_eq!(multiply_simd(&a, &b).unwrap(), scalar);
    }
}

// ============================================================
// Multi-threaded tests
// ============================================================

#[test]
fn test_parallel_rows_single_thread_is_bitwise_basic() {
    for n in [1, 2, 3, 50] {
        let (a, b) = random_pair(n, 3);
        let basic = multiply_basic(&a, &b).unwrap();
        let rows = multiply_parallel_rows(&a, &b, 1).unwrap();
        assert_eq!(basic, rows, "n = {}", n);
    }
}

#[test]
fn test_parallel_rows_any_thread_count() {
    let (a, b) = random_pair(37, 4);
    let basic = multiply_basic(&a, &b).unwrap();
    for threads in [2, 3, 4, 8, 37, 100] {
        let c = multiply_parallel_rows(&a, &b, threads).unwrap();
        assert_eq!(basic, c, "threads = {}", threads);
    }
}

#[test]
fn test_parallel_blocked_thread_counts() {
    let (a, b) = random_pair(50, 12);
    let expected = multiply_blocked(&a, &b, 8).unwrap();
    for threads in [1, 2, 3, 7, 64] {
        let c = multiply_parallel_blocked(&a, &b, 8, threads).unwrap();
        assert_matrices_close(&expected, &c, &format!("parallel_blocked_t{}", threads));
    }
}

// ============================================================
// Error paths
// ============================================================

#[test]
fn test_shape_and_parameter_errors() {
    let a = DenseMatrix::zeros(3);
    let b = DenseMatrix::zeros(4);
    let config = MultiplyConfig::default();

    for variant in Variant::ALL {
        assert!(
            matches!(multiply(variant, &a, &b, &config), Err(MatrixError::DimensionMismatch { .. })),
            "{}",
            variant.name()
        );
    }

    assert!(matches!(multiply_blocked(&a, &a, 0), Err(MatrixError::InvalidBlockSize)));
    assert!(matches!(multiply_parallel_rows(&a, &a, 0), Err(MatrixError::InvalidThreadCount)));
    assert!(matches!(
        multiply_parallel_blocked(&a, &a, 0, 2),
        Err(MatrixError::InvalidBlockSize)
    ));
}

#[test]
fn test_inputs_are_untouched() {
    let (a, b) = random_pair(20, 77);
    let (a0, b0) = (a.clone(), b.clone());
    let _ = all_variants(&a, &b, &MultiplyConfig::default().with_threads(4));
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}
