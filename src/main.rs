//! Benchmark runner for the dense and sparse kernels.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use matkern::sparse::generate::generate_sparse;
use matkern::sparse::mtx::load_csr;
use matkern::sparse::spmv::spmv_parallel;
use matkern::{Capabilities, CsrMatrix, DenseMatrix, MultiplyConfig, Variant, multiply};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Square matrix orders to benchmark.
    #[arg(short, long, value_delimiter = ',', default_values_t = [128, 256, 512, 1024])]
    sizes: Vec<usize>,

    /// Timed runs per variant.
    #[arg(short, long, default_value_t = 5)]
    runs: usize,

    /// Untimed runs before timing each size.
    #[arg(short, long, default_value_t = 1)]
    warmup: usize,

    /// Tile side for the blocked variants.
    #[arg(short, long, default_value_t = matkern::DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Worker threads for the parallel variants (defaults to all cores).
    #[arg(short, long)]
    threads: Option<usize>,

    /// RNG seed for generated matrices.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Sparse matrix in coordinate text format to run SpMV on.
    #[arg(long)]
    mtx: Option<PathBuf>,

    /// Write per-variant averages as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
}

struct Timing {
    name: String,
    size: usize,
    avg_ms: f64,
    gflops: f64,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    anyhow::ensure!(args.runs > 0, "--runs must be at least 1");

    let caps = Capabilities::get();
    let config = MultiplyConfig::default()
        .with_block_size(args.block_size)
        .with_threads(args.threads.unwrap_or(caps.cores));
    info!(dot = caps.dot.name(), cores = caps.cores, ?config, "starting benchmark");

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut timings = Vec::new();

    for &n in &args.sizes {
        println!("\nDense Matrix {n}×{n}");
        println!("{}", "-".repeat(50));

        let a = DenseMatrix::generate(n, &mut rng);
        let b = DenseMatrix::generate(n, &mut rng);

        for _ in 0..args.warmup {
            multiply(Variant::Basic, &a, &b, &config)?;
        }

        let mut size_timings = Vec::new();
        for variant in Variant::ALL {
            let avg_ms = time_runs(args.runs, || {
                multiply(variant, &a, &b, &config).map(drop)
            })?;
            let gflops = 2.0 * (n * n * n) as f64 / (avg_ms / 1000.0) / 1e9;
            size_timings.push(Timing {
                name: variant.name().to_string(),
                size: n,
                avg_ms,
                gflops,
            });
        }

        let baseline = size_timings[0].avg_ms;
        for (i, t) in size_timings.iter().enumerate() {
            println!(
                "{}. {:18} {:10.3} ms  {:6.2} GFLOPS  ({:.1}×)",
                i + 1,
                t.name,
                t.avg_ms,
                t.gflops,
                baseline / t.avg_ms
            );
        }
        timings.extend(size_timings);
    }

    if let Some(path) = &args.mtx {
        let a = load_csr(path).with_context(|| format!("loading {}", path.display()))?;
        println!("\nSparse {} ({}×{}, nnz {})", path.display(), a.rows(), a.cols(), a.nnz());
        timings.push(bench_spmv(&format!("Sparse_{}", stem(path)), &a, &config, args.runs)?);
    }

    println!("\nSynthetic sparse 500×500");
    for sparsity in [0.5, 0.9, 0.99] {
        let a = generate_sparse(500, 500, sparsity, &mut rng)?;
        let name = format!("SparseSynthetic_{}pctZeros", (sparsity * 100.0).round() as u32);
        timings.push(bench_spmv(&name, &a, &config, args.runs)?);
    }

    if let Some(path) = &args.csv {
        write_csv(path, &timings).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = timings.len(), "wrote results");
    }
    Ok(())
}

/// Average wall time of `runs` calls to `f`, in milliseconds.
fn time_runs<F>(runs: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> matkern::Result<()>,
{
    let mut total = 0.0;
    for _ in 0..runs {
        let start = Instant::now();
        f()?;
        total += start.elapsed().as_secs_f64();
    }
    Ok(total / runs as f64 * 1000.0)
}

fn bench_spmv(name: &str, a: &CsrMatrix, config: &MultiplyConfig, runs: usize) -> Result<Timing> {
    let x = vec![1.0; a.cols()];
    let mut y = vec![0.0; a.rows()];
    let avg_ms = time_runs(runs, || spmv_parallel(a, &x, &mut y, config.threads))?;
    let gflops = 2.0 * a.nnz() as f64 / (avg_ms / 1000.0) / 1e9;
    println!("{:32} {:10.3} ms  {:6.2} GFLOPS  (nnz {})", name, avg_ms, gflops, a.nnz());
    Ok(Timing {
        name: name.to_string(),
        size: a.rows(),
        avg_ms,
        gflops,
    })
}

fn stem(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matrix".to_string())
}

fn write_csv(path: &std::path::Path, timings: &[Timing]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Approach,MatrixSize,AverageWallMs,GFLOPS")?;
    for t in timings {
        writeln!(out, "{},{},{:.6},{:.4}", t.name, t.size, t.avg_ms, t.gflops)?;
    }
    out.flush()?;
    Ok(())
}
