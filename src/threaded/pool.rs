//! Fixed-size fork/join worker pool.
//!
//! Work is split statically into contiguous ranges, one per worker, and the
//! call returns only after every worker has joined. Each output cell has a
//! single writer, so nothing here locks.

use std::ops::Range;
use std::thread;

use tracing::trace;

use crate::error::{MatrixError, Result};

/// Number of workers to launch for `items` units of work.
///
/// Never more than `requested`, never more than there are items, and at
/// least one.
pub fn worker_count(requested: usize, items: usize) -> Result<usize> {
    if requested == 0 {
        return Err(MatrixError::InvalidThreadCount);
    }
    Ok(requested.min(items).max(1))
}

/// Splits `0..len` into `parts` contiguous ranges whose sizes differ by at
/// most one. Earlier ranges get the extra items.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for p in 0..parts {
        let size = base + usize::from(p < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Runs `f(rows, band)` on `workers` threads, where `band` is the slice of
/// `out` holding rows `rows` (each row is `row_len` values).
///
/// Bands are disjoint `split_at_mut` pieces of `out`. With one worker `f`
/// runs on the calling thread.
pub fn run_row_bands<F>(out: &mut [f64], row_len: usize, workers: usize, f: F)
where
    F: Fn(Range<usize>, &mut [f64]) + Sync,
{
    let rows = if row_len == 0 { 0 } else { out.len() / row_len };
    if workers <= 1 {
        f(0..rows, out);
        return;
    }

    let f = &f;
    thread::scope(|s| {
        let mut rest = out;
        for (tid, range) in partition(rows, workers).into_iter().enumerate() {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * row_len);
            rest = tail;
            trace!(tid, start = range.start, end = range.end, "spawning row worker");
            s.spawn(move || f(range, band));
        }
    });
}

/// Raw view of an output buffer shared by workers that write disjoint
/// cells.
#[derive(Clone, Copy)]
pub(crate) struct SharedOutput {
    ptr: *mut f64,
    len: usize,
}

unsafe impl Send for SharedOutput {}
unsafe impl Sync for SharedOutput {}

impl SharedOutput {
    pub(crate) fn new(buf: &mut [f64]) -> Self {
        Self {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
        }
    }

    /// Adds `value` into cell `idx`.
    ///
    /// # Safety
    ///
    /// The buffer must outlive every use of this view, and no other thread
    /// may read or write cell `idx` while this call runs.
    #[inline]
    pub(crate) unsafe fn add(&self, idx: usize, value: f64) {
        debug_assert!(idx < self.len);
        unsafe { *self.ptr.add(idx) += value };
    }
}
