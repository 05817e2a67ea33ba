use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

/// Options to tune to improve performance depending on the hardware.
///
/// Calling the reversal routines without specifying options will automatically select the widest
/// instruction set the running CPU supports.
///
/// You only need to tune these options if you want to pin a particular set of tiers, e.g. to
/// compare them against each other on a known hardware platform.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Instruction set whose tiers are used. `None` detects it at runtime.
    ///
    /// A level the running CPU cannot execute is ignored in favor of the detected one.
    pub simd: Option<SimdLevel>,
}

impl Options {
    /// Options pinned to `level`
    pub fn with_simd(level: SimdLevel) -> Self {
        Options { simd: Some(level) }
    }

    /// The level the reversal will actually run with. Always supported by the running CPU.
    pub fn simd_level(&self) -> SimdLevel {
        match self.simd {
            Some(level) if level.is_supported() => level,
            Some(level) => {
                let detected = SimdLevel::detect();
                tracing::debug!(
                    requested = %level,
                    %detected,
                    "requested SIMD level is not supported, falling back"
                );
                detected
            }
            None => SimdLevel::detect(),
        }
    }
}

/// The instruction set family whose tiers a reversal uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SimdLevel {
    /// Scalar byte swaps and element swaps only
    Portable,
    /// 16-byte tiers using SSE2/SSSE3 shuffles (x86)
    Ssse3,
    /// Adds 32-byte AVX2 permutes (x86)
    Avx2,
    /// Adds 64-byte AVX-512F/BW permutes (x86)
    Avx512,
    /// 16-byte tiers using NEON `rev`/`ext` (aarch64)
    Neon,
}

static DETECTED: OnceLock<SimdLevel> = OnceLock::new();

impl SimdLevel {
    /// Every level, in the order they are listed above
    pub const ALL: [SimdLevel; 5] = [
        SimdLevel::Portable,
        SimdLevel::Ssse3,
        SimdLevel::Avx2,
        SimdLevel::Avx512,
        SimdLevel::Neon,
    ];

    /// The widest level the running CPU supports. Probed once, then cached.
    pub fn detect() -> SimdLevel {
        *DETECTED.get_or_init(|| {
            let level = SimdLevel::ALL
                .into_iter()
                .rev()
                .find(|level| level.is_supported())
                .unwrap_or(SimdLevel::Portable);
            tracing::debug!(%level, "detected SIMD level");
            level
        })
    }

    /// Whether the running CPU can execute every tier of this level
    pub fn is_supported(self) -> bool {
        match self {
            SimdLevel::Portable => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Ssse3 => ssse3_detected(),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx2 => ssse3_detected() && avx2_detected(),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx512 => ssse3_detected() && avx2_detected() && avx512_detected(),
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => std::arch::is_aarch64_feature_detected!("neon"),
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SimdLevel::Portable => "portable",
            SimdLevel::Ssse3 => "ssse3",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
            SimdLevel::Neon => "neon",
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline(always)]
fn ssse3_detected() -> bool {
    std::arch::is_x86_feature_detected!("sse2") && std::arch::is_x86_feature_detected!("ssse3")
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline(always)]
fn avx2_detected() -> bool {
    std::arch::is_x86_feature_detected!("avx2")
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline(always)]
fn avx512_detected() -> bool {
    std::arch::is_x86_feature_detected!("avx512f")
        && std::arch::is_x86_feature_detected!("avx512bw")
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`SimdLevel`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown SIMD level `{0}` (expected one of: portable, ssse3, avx2, avx512, neon)")]
pub struct ParseSimdLevelError(pub String);

impl FromStr for SimdLevel {
    type Err = ParseSimdLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimdLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSimdLevelError(s.to_owned()))
    }
}
