//! Multi-threaded dense variants.
//!
//! Both split the output so that every cell of C has exactly one writer,
//! then join before returning.
//!
//! Available implementations:
//! - `rows`: contiguous row bands running the reference loop
//! - `tiles`: contiguous runs of (ii, jj) tiles running the blocked loop

pub mod pool;
pub mod rows;
pub mod tiles;
