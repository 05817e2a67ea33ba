//! 16-byte x86 kernels (SSE2/SSSE3)
//!
//! All loads and stores are unaligned; block offsets come from a [`Cursor`] created for the same
//! slice, so every 16-byte access stays inside it.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::kernels::Cursor;

const WIDTH: usize = 16;

/// Byte `k` takes byte `15 - k`
#[target_feature(enable = "sse2,ssse3")]
#[inline]
unsafe fn reverse_u8x16(v: __m128i) -> __m128i {
    let mask = _mm_setr_epi8(15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0);
    _mm_shuffle_epi8(v, mask)
}

/// Byte pair `k` takes byte pair `7 - k`, keeping the order inside each pair
#[target_feature(enable = "sse2,ssse3")]
#[inline]
unsafe fn reverse_u16x8(v: __m128i) -> __m128i {
    let mask = _mm_setr_epi8(14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1);
    _mm_shuffle_epi8(v, mask)
}

/// `pshufd` with control (3, 2, 1, 0)
#[target_feature(enable = "sse2")]
#[inline]
unsafe fn reverse_u32x4(v: __m128i) -> __m128i {
    _mm_shuffle_epi32::<0b00_01_10_11>(v)
}

/// Rotating by eight bytes exchanges the two 64-bit lanes
#[target_feature(enable = "sse2,ssse3")]
#[inline]
unsafe fn reverse_u64x2(v: __m128i) -> __m128i {
    _mm_alignr_epi8::<8>(v, v)
}

macro_rules! sse_tier {
    ($func_name:ident, $lane_reverse:ident) => {
        /// # Safety
        ///
        /// `cursor` must span `bytes`, and the CPU must support SSSE3.
        #[target_feature(enable = "sse2,ssse3")]
        pub(crate) unsafe fn $func_name(bytes: &mut [u8], cursor: &mut Cursor) {
            debug_assert_eq!(WIDTH % cursor.element_size(), 0);
            debug_assert!(cursor.remaining().1 <= bytes.len());
            let base = bytes.as_mut_ptr();

            while let Some((lower, upper)) = cursor.take(WIDTH) {
                let low = _mm_loadu_si128(base.add(lower) as *const __m128i);
                let high = _mm_loadu_si128(base.add(upper) as *const __m128i);
                _mm_storeu_si128(base.add(lower) as *mut __m128i, $lane_reverse(high));
                _mm_storeu_si128(base.add(upper) as *mut __m128i, $lane_reverse(low));
            }
        }
    };
}

sse_tier!(reverse_bytes_16, reverse_u8x16);
sse_tier!(reverse_words_16, reverse_u16x8);
sse_tier!(reverse_dwords_16, reverse_u32x4);
sse_tier!(reverse_qwords_16, reverse_u64x2);
