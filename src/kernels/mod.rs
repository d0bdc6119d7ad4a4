//! Low-level compute kernels and the one-time CPU capability probe.
//!
//! - `dot`: 4-lane dot product, AVX2 and a bit-identical scalar fallback

pub mod dot;

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use tracing::debug;

pub use dot::DotKernel;

/// What the running machine supports, probed once per process.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Dot product kernel used by the SIMD multiply.
    pub dot: DotKernel,
    /// Hardware threads available to this process.
    pub cores: usize,
}

impl Capabilities {
    pub fn get() -> &'static Capabilities {
        static CAPS: OnceLock<Capabilities> = OnceLock::new();
        CAPS.get_or_init(Self::probe)
    }

    fn probe() -> Self {
        let dot = DotKernel::detect();
        let cores = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        debug!(dot = dot.name(), cores, "probed cpu capabilities");
        Capabilities { dot, cores }
    }
}
