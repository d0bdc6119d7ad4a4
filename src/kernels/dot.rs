//! 4-lane dot product kernels.
//!
//! Both kernels keep four independent partial sums (one per f64 lane of a
//! 256-bit register), reduce them as `((l0 + l1) + l2) + l3`, then add the
//! `len % 4` tail in order. The scalar kernel replays exactly the same
//! operations, so the two return bit-identical results.

/// f64 lanes in one AVX2 register.
pub const LANES: usize = 4;

/// Which dot product implementation a SIMD multiply runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotKernel {
    /// Portable lane-emulating loop.
    Scalar,
    /// 256-bit AVX2 loads and adds. Only valid where the CPU supports AVX2.
    Avx2,
}

impl DotKernel {
    /// Picks the widest kernel the running CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return DotKernel::Avx2;
            }
        }
        DotKernel::Scalar
    }

    /// Whether this kernel can run on the current CPU.
    pub fn is_supported(self) -> bool {
        match self {
            DotKernel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            DotKernel::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(not(target_arch = "x86_64"))]
            DotKernel::Avx2 => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DotKernel::Scalar => "scalar",
            DotKernel::Avx2 => "avx2",
        }
    }
}

/// Scalar dot product over `a.len()` elements of `a` and `b`.
///
/// `b` must be at least as long as `a`.
pub fn dot_scalar(a: &[f64], b: &[f64]) -> f64 {
    let b = &b[..a.len()];
    let mut lanes = [0.0f64; LANES];

    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (ca, cb) in a_chunks.zip(b_chunks) {
        for l in 0..LANES {
            lanes[l] += ca[l] * cb[l];
        }
    }

    let mut sum = lanes[0] + lanes[1] + lanes[2] + lanes[3];
    for (x, y) in a_tail.iter().zip(b_tail) {
        sum += x * y;
    }
    sum
}

/// AVX2 dot product over `a.len()` elements of `a` and `b`.
///
/// Uses separate multiply and add (no FMA) so rounding matches
/// [`dot_scalar`].
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `b.len() >= a.len()`
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn dot_avx2(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let len = a.len();
    debug_assert!(b.len() >= len);
    let main = (len / LANES) * LANES;

    let mut acc = _mm256_setzero_pd();
    let mut p = 0;
    while p < main {
        let va = _mm256_loadu_pd(a.as_ptr().add(p));
        let vb = _mm256_loadu_pd(b.as_ptr().add(p));
        acc = _mm256_add_pd(acc, _mm256_mul_pd(va, vb));
        p += LANES;
    }

    let mut lanes = [0.0f64; LANES];
    _mm256_storeu_pd(lanes.as_mut_ptr(), acc);

    let mut sum = lanes[0] + lanes[1] + lanes[2] + lanes[3];
    for q in main..len {
        sum += a[q] * b[q];
    }
    sum
}
