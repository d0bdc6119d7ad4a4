//! Dense matrix storage and the reference kernels.
//!
//! `basic` is the numerical ground truth; `transpose` produces the
//! pre-transposed operand consumed by the SIMD kernel.

pub mod basic;
pub mod dense;
pub mod transpose;
