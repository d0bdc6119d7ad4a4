//! Tile-parallel blocked multiply.

use std::thread;

use tracing::{instrument, trace};

use super::pool::{SharedOutput, partition, worker_count};
use crate::blocked::tiled::accumulate_tile;
use crate::error::{MatrixError, Result};
use crate::matrix::dense::{DenseMatrix, check_same_order};

/// Multi-threaded version of
/// [`multiply_blocked`](crate::blocked::tiled::multiply_blocked).
///
/// The (ii, jj) output tiles are numbered row by row and split into
/// contiguous runs, one per worker. A worker performs the whole kk
/// accumulation for each of its tiles, so no two workers ever touch the
/// same cell of C and no atomics are needed. Splitting along kk instead
/// would race on the accumulation.
#[instrument(level = "debug", skip_all, fields(n = a.n(), block_size = block_size, threads = threads))]
pub fn multiply_parallel_blocked(
    a: &DenseMatrix,
    b: &DenseMatrix,
    block_size: usize,
    threads: usize,
) -> Result<DenseMatrix> {
    let n = check_same_order(a, b)?;
    if block_size == 0 {
        return Err(MatrixError::InvalidBlockSize);
    }

    let tiles_per_side = n.div_ceil(block_size);
    let tiles = tiles_per_side * tiles_per_side;
    let workers = worker_count(threads, tiles)?;

    let mut c = DenseMatrix::zeros(n);
    let (a, b) = (a.as_slice(), b.as_slice());
    let out = SharedOutput::new(c.as_mut_slice());

    let run_tiles = |tile_range: std::ops::Range<usize>| {
        for t in tile_range {
            let ii = (t / tiles_per_side) * block_size;
            let jj = (t % tiles_per_side) * block_size;
            // SAFETY: tile t is owned by exactly one worker, and
            // accumulate_tile only writes cells inside tile t.
            accumulate_tile(a, b, n, block_size, ii, jj, |idx, sum| unsafe { out.add(idx, sum) });
        }
    };

    if workers == 1 {
        run_tiles(0..tiles);
        return Ok(c);
    }

    let run_tiles = &run_tiles;
    thread::scope(|s| {
        for (tid, tile_range) in partition(tiles, workers).into_iter().enumerate() {
            trace!(tid, start = tile_range.start, end = tile_range.end, "spawning tile worker");
            s.spawn(move || run_tiles(tile_range));
        }
    });
    Ok(c)
}
