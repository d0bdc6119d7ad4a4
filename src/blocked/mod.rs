//! Single-threaded dense variants that change the memory-access order.
//!
//! Available implementations:
//! - `tiled`: cube-tiled i/j/k loops (cache blocking)
//! - `simd`: 4-lane dot products over a pre-transposed B

pub mod simd;
pub mod tiled;
