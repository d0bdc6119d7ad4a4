use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use matkern::sparse::generate::generate_sparse;
use matkern::sparse::matmul::csr_matmul;
use matkern::sparse::spmv::spmv;
use matkern::{DenseMatrix, MultiplyConfig, Variant, multiply};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

fn bench_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense");
    let config = MultiplyConfig::default();
    let mut rng = SmallRng::seed_from_u64(1);

    for n in [64, 128, 256] {
        let a = DenseMatrix::generate(n, &mut rng);
        let b = DenseMatrix::generate(n, &mut rng);
        for variant in Variant::ALL {
            group.bench_with_input(BenchmarkId::new(variant.name(), n), &n, |bench, _| {
                bench.iter(|| multiply(variant, black_box(&a), black_box(&b), &config).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse");
    let mut rng = SmallRng::seed_from_u64(2);

    for sparsity in [0.9, 0.99] {
        let a = generate_sparse(500, 500, sparsity, &mut rng).unwrap();
        let x = vec![1.0; 500];
        let mut y = vec![0.0; 500];
        let label = format!("{sparsity}");

        group.bench_function(BenchmarkId::new("spmv", &label), |bench| {
            bench.iter(|| spmv(black_box(&a), black_box(&x), &mut y).unwrap())
        });
        group.bench_function(BenchmarkId::new("csr_matmul", &label), |bench| {
            bench.iter(|| csr_matmul(black_box(&a), black_box(&a)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dense, bench_sparse);
criterion_main!(benches);
