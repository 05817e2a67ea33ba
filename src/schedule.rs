//! The reversal staircase.
//!
//! For every element size there is one table of tiers per [`SimdLevel`], ordered from the widest
//! width down to a single element. The executor drains the tiers in order over one shared
//! [`Cursor`]; [`plan`] replays the same tables without touching any memory.
//!
//! Only the one-byte tables use scalar byte swaps. A byte swap over wider elements would also
//! reverse the bytes inside each element.

use std::ops::Range;

use crate::kernels::{portable, Cursor, Drain};
use crate::options::SimdLevel;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::kernels::{avx2, avx512, sse};
#[cfg(target_arch = "aarch64")]
use crate::kernels::neon;

/// One step size of the staircase
#[derive(Clone, Copy)]
pub(crate) struct Tier {
    pub(crate) name: &'static str,
    /// Elements reversed per side per step
    pub(crate) lanes: usize,
    pub(crate) drain: Drain,
}

impl Tier {
    pub(crate) fn width(&self, element_size: usize) -> usize {
        self.lanes * element_size
    }
}

macro_rules! tier {
    ($name:literal, $lanes:expr, $drain:expr) => {
        Tier {
            name: $name,
            lanes: $lanes,
            drain: $drain,
        }
    };
}

const BSWAP_64: Tier = tier!("bswap64", 8, portable::reverse_bswap_64);
const BSWAP_32: Tier = tier!("bswap32", 4, portable::reverse_bswap_32);
const BSWAP_16: Tier = tier!("bswap16", 2, portable::reverse_bswap_16);
const ELEMENT_1: Tier = tier!("element", 1, portable::reverse_elements::<1>);
const ELEMENT_2: Tier = tier!("element", 1, portable::reverse_elements::<2>);
const ELEMENT_4: Tier = tier!("element", 1, portable::reverse_elements::<4>);
const ELEMENT_8: Tier = tier!("element", 1, portable::reverse_elements::<8>);
const BLOCK: Tier = tier!("block", 1, portable::reverse_blocks);

static BYTES_PORTABLE: [Tier; 4] = [BSWAP_64, BSWAP_32, BSWAP_16, ELEMENT_1];
static WORDS_PORTABLE: [Tier; 1] = [ELEMENT_2];
static DWORDS_PORTABLE: [Tier; 1] = [ELEMENT_4];
static QWORDS_PORTABLE: [Tier; 1] = [ELEMENT_8];
static BLOCKS: [Tier; 1] = [BLOCK];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    use super::*;

    const SSSE3_BYTES: Tier = tier!("ssse3", 16, sse::reverse_bytes_16);
    const SSSE3_WORDS: Tier = tier!("ssse3", 8, sse::reverse_words_16);
    const SSE2_DWORDS: Tier = tier!("sse2", 4, sse::reverse_dwords_16);
    const SSSE3_QWORDS: Tier = tier!("ssse3", 2, sse::reverse_qwords_16);

    const AVX2_BYTES: Tier = tier!("avx2", 32, avx2::reverse_bytes_32);
    const AVX2_WORDS: Tier = tier!("avx2", 16, avx2::reverse_words_32);
    const AVX2_DWORDS: Tier = tier!("avx2", 8, avx2::reverse_dwords_32);
    const AVX2_QWORDS: Tier = tier!("avx2", 4, avx2::reverse_qwords_32);
    const AVX2_QWORDS_PAIR: Tier = tier!("avx2x2", 8, avx2::reverse_qwords_64);

    const AVX512_BYTES: Tier = tier!("avx512", 64, avx512::reverse_bytes_64);
    const AVX512_QWORDS: Tier = tier!("avx512", 8, avx512::reverse_qwords_64);

    pub(super) static BYTES_SSSE3: [Tier; 5] =
        [SSSE3_BYTES, BSWAP_64, BSWAP_32, BSWAP_16, ELEMENT_1];
    pub(super) static BYTES_AVX2: [Tier; 6] =
        [AVX2_BYTES, SSSE3_BYTES, BSWAP_64, BSWAP_32, BSWAP_16, ELEMENT_1];
    pub(super) static BYTES_AVX512: [Tier; 7] = [
        AVX512_BYTES,
        AVX2_BYTES,
        SSSE3_BYTES,
        BSWAP_64,
        BSWAP_32,
        BSWAP_16,
        ELEMENT_1,
    ];

    pub(super) static WORDS_SSSE3: [Tier; 2] = [SSSE3_WORDS, ELEMENT_2];
    pub(super) static WORDS_AVX2: [Tier; 3] = [AVX2_WORDS, SSSE3_WORDS, ELEMENT_2];

    pub(super) static DWORDS_SSSE3: [Tier; 2] = [SSE2_DWORDS, ELEMENT_4];
    pub(super) static DWORDS_AVX2: [Tier; 3] = [AVX2_DWORDS, SSE2_DWORDS, ELEMENT_4];

    pub(super) static QWORDS_SSSE3: [Tier; 2] = [SSSE3_QWORDS, ELEMENT_8];
    pub(super) static QWORDS_AVX2: [Tier; 4] =
        [AVX2_QWORDS_PAIR, AVX2_QWORDS, SSSE3_QWORDS, ELEMENT_8];
    pub(super) static QWORDS_AVX512: [Tier; 4] =
        [AVX512_QWORDS, AVX2_QWORDS, SSSE3_QWORDS, ELEMENT_8];
}

#[cfg(target_arch = "aarch64")]
mod arm {
    use super::*;

    pub(super) static BYTES_NEON: [Tier; 5] = [
        tier!("neon", 16, neon::reverse_bytes_16),
        BSWAP_64,
        BSWAP_32,
        BSWAP_16,
        ELEMENT_1,
    ];
    pub(super) static WORDS_NEON: [Tier; 2] = [tier!("neon", 8, neon::reverse_words_16), ELEMENT_2];
    pub(super) static DWORDS_NEON: [Tier; 2] =
        [tier!("neon", 4, neon::reverse_dwords_16), ELEMENT_4];
    pub(super) static QWORDS_NEON: [Tier; 2] =
        [tier!("neon", 2, neon::reverse_qwords_16), ELEMENT_8];
}

/// The tiers used for `element_size` at `level`, widest first.
///
/// Levels that do not exist on the compile target get the portable table.
#[inline]
pub(crate) fn tiers(element_size: usize, level: SimdLevel) -> &'static [Tier] {
    match (element_size, level) {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (1, SimdLevel::Avx512) => &x86::BYTES_AVX512,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (1, SimdLevel::Avx2) => &x86::BYTES_AVX2,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (1, SimdLevel::Ssse3) => &x86::BYTES_SSSE3,
        #[cfg(target_arch = "aarch64")]
        (1, SimdLevel::Neon) => &arm::BYTES_NEON,
        (1, _) => &BYTES_PORTABLE,

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (2, SimdLevel::Avx512 | SimdLevel::Avx2) => &x86::WORDS_AVX2,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (2, SimdLevel::Ssse3) => &x86::WORDS_SSSE3,
        #[cfg(target_arch = "aarch64")]
        (2, SimdLevel::Neon) => &arm::WORDS_NEON,
        (2, _) => &WORDS_PORTABLE,

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (4, SimdLevel::Avx512 | SimdLevel::Avx2) => &x86::DWORDS_AVX2,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (4, SimdLevel::Ssse3) => &x86::DWORDS_SSSE3,
        #[cfg(target_arch = "aarch64")]
        (4, SimdLevel::Neon) => &arm::DWORDS_NEON,
        (4, _) => &DWORDS_PORTABLE,

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (8, SimdLevel::Avx512) => &x86::QWORDS_AVX512,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (8, SimdLevel::Avx2) => &x86::QWORDS_AVX2,
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        (8, SimdLevel::Ssse3) => &x86::QWORDS_SSSE3,
        #[cfg(target_arch = "aarch64")]
        (8, SimdLevel::Neon) => &arm::QWORDS_NEON,
        (8, _) => &QWORDS_PORTABLE,

        _ => &BLOCKS,
    }
}

/// Reverses `bytes` as a sequence of `element_size`-byte elements.
///
/// # Safety
///
/// `level` must be supported by the running CPU, `element_size` must be non-zero and
/// `bytes.len()` a multiple of it.
#[inline]
pub(crate) unsafe fn execute(bytes: &mut [u8], element_size: usize, level: SimdLevel) {
    debug_assert!(level.is_supported());
    let mut cursor = Cursor::new(bytes.len(), element_size);
    for tier in tiers(element_size, level) {
        (tier.drain)(bytes, &mut cursor);
    }
}

/// One block exchange the reversal performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Name of the tier, e.g. `"avx2"`, `"bswap32"` or `"element"`
    pub tier: &'static str,
    /// Bytes per block
    pub width: usize,
    /// Byte range of the lower block
    pub lower: Range<usize>,
    /// Byte range of the upper block
    pub upper: Range<usize>,
}

/// Lists, in order, every block exchange reversing `count` elements of `element_size` bytes
/// would perform at `level`.
///
/// Nothing is executed, so `level` does not have to be supported by the running CPU. A level that
/// does not exist on the compile target is planned with the portable tiers.
///
/// # Panics
///
/// Panics if `element_size` is zero, or `count * element_size` overflows.
pub fn plan(count: usize, element_size: usize, level: SimdLevel) -> Vec<Step> {
    assert!(element_size > 0, "element size must be non-zero");
    let Some(len) = count.checked_mul(element_size) else {
        panic!("{count} elements of {element_size} bytes overflow usize");
    };

    let mut cursor = Cursor::new(len, element_size);
    let mut steps = Vec::new();
    for tier in tiers(element_size, level) {
        let width = tier.width(element_size);
        while let Some((lower, upper)) = cursor.take(width) {
            steps.push(Step {
                tier: tier.name,
                width,
                lower: lower..lower + width,
                upper: upper..upper + width,
            });
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: [usize; 9] = [1, 2, 3, 4, 5, 7, 8, 16, 17];

    fn widths(element_size: usize, level: SimdLevel) -> Vec<usize> {
        tiers(element_size, level)
            .iter()
            .map(|tier| tier.width(element_size))
            .collect()
    }

    #[test]
    fn widths_descend_to_one_element() {
        for element_size in SIZES {
            for level in SimdLevel::ALL {
                let widths = widths(element_size, level);
                assert!(widths.windows(2).all(|w| w[0] > w[1]), "{widths:?}");
                assert_eq!(widths.last(), Some(&element_size));
                assert!(widths.iter().all(|w| w % element_size == 0));
            }
        }
    }

    #[test]
    fn byte_swaps_only_for_single_bytes() {
        for element_size in SIZES.into_iter().filter(|&s| s > 1) {
            for level in SimdLevel::ALL {
                assert!(tiers(element_size, level)
                    .iter()
                    .all(|tier| !tier.name.starts_with("bswap")));
            }
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn x86_staircases() {
        assert_eq!(widths(1, SimdLevel::Portable), [8, 4, 2, 1]);
        assert_eq!(widths(1, SimdLevel::Ssse3), [16, 8, 4, 2, 1]);
        assert_eq!(widths(1, SimdLevel::Avx2), [32, 16, 8, 4, 2, 1]);
        assert_eq!(widths(1, SimdLevel::Avx512), [64, 32, 16, 8, 4, 2, 1]);
        assert_eq!(widths(2, SimdLevel::Avx2), [32, 16, 2]);
        assert_eq!(widths(2, SimdLevel::Portable), [2]);
        assert_eq!(widths(4, SimdLevel::Avx512), [32, 16, 4]);
        assert_eq!(widths(8, SimdLevel::Avx2), [64, 32, 16, 8]);
        assert_eq!(widths(8, SimdLevel::Avx512), [64, 32, 16, 8]);
        assert_eq!(widths(8, SimdLevel::Ssse3), [16, 8]);
        assert_eq!(widths(3, SimdLevel::Avx512), [3]);
        assert_eq!(widths(16, SimdLevel::Avx2), [16]);
        // no NEON tiers on x86
        assert_eq!(widths(1, SimdLevel::Neon), [8, 4, 2, 1]);
    }

    /// Tiers a plan steps through, with repeated steps of one tier collapsed
    fn tier_sequence(steps: &[Step]) -> Vec<(&'static str, usize)> {
        let mut tiers: Vec<_> = steps.iter().map(|s| (s.tier, s.width)).collect();
        tiers.dedup();
        tiers
    }

    fn assert_only_middle_untouched(steps: &[Step], len: usize, middle: usize) {
        let mut covered = vec![false; len];
        for step in steps {
            for i in step.lower.clone().chain(step.upper.clone()) {
                assert!(!covered[i], "byte {i} swapped twice");
                covered[i] = true;
            }
        }
        let untouched: Vec<usize> = (0..len).filter(|&i| !covered[i]).collect();
        assert_eq!(untouched, [middle]);
    }

    #[test]
    fn prime_count_runs_every_portable_tier() {
        let steps = plan(79, 1, SimdLevel::Portable);
        assert_eq!(
            tier_sequence(&steps),
            [("bswap64", 8), ("bswap32", 4), ("bswap16", 2), ("element", 1)]
        );
        assert_eq!(steps.iter().filter(|s| s.tier == "bswap64").count(), 4);
        assert_only_middle_untouched(&steps, 79, 39);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn prime_count_skips_tiers_that_no_longer_fit() {
        // after one 32-byte pair only 15 bytes remain, too few for ssse3 or bswap64
        let steps = plan(79, 1, SimdLevel::Avx2);
        assert_eq!(
            tier_sequence(&steps),
            [("avx2", 32), ("bswap32", 4), ("bswap16", 2), ("element", 1)]
        );
        assert_only_middle_untouched(&steps, 79, 39);
    }

    #[test]
    fn steps_never_overlap_and_converge() {
        for element_size in SIZES {
            for level in SimdLevel::ALL {
                for count in [0, 1, 2, 3, 31, 64, 65, 200, 1000] {
                    let steps = plan(count, element_size, level);
                    let len = count * element_size;
                    let mut lower_end = 0;
                    let mut upper_start = len;
                    for step in &steps {
                        assert_eq!(step.lower.start, lower_end);
                        assert_eq!(step.upper.end, upper_start);
                        assert!(step.lower.end <= step.upper.start);
                        assert_eq!(step.lower.start % element_size, 0);
                        lower_end = step.lower.end;
                        upper_start = step.upper.start;
                    }
                    // at most the middle element is left out
                    assert!(upper_start - lower_end <= element_size);
                    assert_eq!((upper_start - lower_end) / element_size, count % 2);
                }
            }
        }
    }

    #[test]
    fn nothing_to_do_below_two_elements() {
        for level in SimdLevel::ALL {
            assert!(plan(0, 4, level).is_empty());
            assert!(plan(1, 4, level).is_empty());
            assert_eq!(plan(2, 4, level).len(), 1);
        }
    }

    #[test]
    fn execute_matches_plan() {
        let level = SimdLevel::detect();
        for element_size in SIZES {
            let count = 157;
            let mut bytes: Vec<u8> = (0..count * element_size).map(|i| i as u8).collect();
            let mut planned = bytes.clone();
            for step in plan(count, element_size, level) {
                let lower: Vec<u8> = planned[step.lower.clone()].to_vec();
                let upper: Vec<u8> = planned[step.upper.clone()].to_vec();
                let reverse = |block: &[u8]| -> Vec<u8> {
                    block
                        .chunks_exact(element_size)
                        .rev()
                        .flatten()
                        .copied()
                        .collect()
                };
                planned[step.lower.clone()].copy_from_slice(&reverse(&upper));
                planned[step.upper.clone()].copy_from_slice(&reverse(&lower));
            }
            unsafe { execute(&mut bytes, element_size, level) };
            assert_eq!(bytes, planned);
        }
    }
}
