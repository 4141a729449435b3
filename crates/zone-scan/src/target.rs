//! Runtime selection of the indexer variant.
//!
//! Probed once per parse; the per-window scan then dispatches through a
//! plain enum match, never per byte. `ZONE_TARGET` forces a variant by
//! name; unknown names are ignored and an unsupported-but-named variant
//! falls through the normal priority order starting at that entry, so
//! `ZONE_TARGET=fallback` always works and `ZONE_TARGET=haswell` on an
//! SSE-only machine degrades gracefully.

use crate::classify::{self, BlockMasks};

/// Environment variable overriding the probe order.
pub const TARGET_ENV: &str = "ZONE_TARGET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// AVX2 (Haswell and later).
    Haswell,
    /// SSE4.2 (Westmere and later).
    Westmere,
    /// Scalar; always available, tape-identical to the SIMD variants.
    Fallback,
}

/// Priority order: widest first.
const TARGETS: [Driver; 3] = [Driver::Haswell, Driver::Westmere, Driver::Fallback];

impl Driver {
    pub fn name(self) -> &'static str {
        match self {
            Driver::Haswell => "haswell",
            Driver::Westmere => "westmere",
            Driver::Fallback => "fallback",
        }
    }

    fn supported(self) -> bool {
        match self {
            Driver::Haswell => avx2_available(),
            Driver::Westmere => sse42_available(),
            Driver::Fallback => true,
        }
    }

    /// Probe CPU capability, honoring `ZONE_TARGET`.
    pub fn select() -> Driver {
        let mut from = 0;
        if let Ok(preferred) = std::env::var(TARGET_ENV) {
            if let Some(at) = TARGETS
                .iter()
                .position(|t| t.name().eq_ignore_ascii_case(&preferred))
            {
                from = at;
            }
        }
        let driver = TARGETS[from..]
            .iter()
            .copied()
            .find(|t| t.supported())
            .unwrap_or(Driver::Fallback);
        tracing::debug!(target: "zone::scan", driver = driver.name(), "selected indexer");
        driver
    }

    /// Classify one 64-byte chunk with the selected implementation.
    #[inline]
    pub fn classify(self, chunk: &[u8; 64]) -> BlockMasks {
        match self {
            #[cfg(target_arch = "x86_64")]
            // SAFETY: `select` admits these variants only when the CPU
            // reports the matching feature.
            Driver::Haswell => unsafe { classify::haswell::classify(chunk) },
            #[cfg(target_arch = "x86_64")]
            Driver::Westmere => unsafe { classify::westmere::classify(chunk) },
            #[cfg(not(target_arch = "x86_64"))]
            Driver::Haswell | Driver::Westmere => classify::fallback::classify(chunk),
            Driver::Fallback => classify::fallback::classify(chunk),
        }
    }
}

fn avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

fn sse42_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("sse4.2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}
