//! 64-byte x86 kernels (AVX-512F + AVX-512BW)

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::kernels::Cursor;

const WIDTH: usize = 64;

/// Reverses the 64 bytes of `v`.
///
/// `vpshufb` reverses the bytes of each 128-bit sub-lane, then a qword permute reverses the order
/// of the four sub-lanes. This only needs AVX-512BW, unlike the single `vpermb` (AVX-512VBMI).
#[target_feature(enable = "avx512f,avx512bw")]
#[inline]
unsafe fn reverse_u8x64(v: __m512i) -> __m512i {
    let mask = _mm512_broadcast_i32x4(_mm_setr_epi8(
        15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
    ));
    let sub_lanes = _mm512_setr_epi64(6, 7, 4, 5, 2, 3, 0, 1);
    _mm512_permutexvar_epi64(sub_lanes, _mm512_shuffle_epi8(v, mask))
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn reverse_u64x8(v: __m512i) -> __m512i {
    _mm512_permutexvar_epi64(_mm512_setr_epi64(7, 6, 5, 4, 3, 2, 1, 0), v)
}

macro_rules! avx512_tier {
    ($func_name:ident, $lane_reverse:ident) => {
        /// # Safety
        ///
        /// `cursor` must span `bytes`, and the CPU must support AVX-512F and AVX-512BW.
        #[target_feature(enable = "avx512f,avx512bw")]
        pub(crate) unsafe fn $func_name(bytes: &mut [u8], cursor: &mut Cursor) {
            debug_assert_eq!(WIDTH % cursor.element_size(), 0);
            debug_assert!(cursor.remaining().1 <= bytes.len());
            let base = bytes.as_mut_ptr();

            while let Some((lower, upper)) = cursor.take(WIDTH) {
                let low = _mm512_loadu_epi8(base.add(lower) as *const i8);
                let high = _mm512_loadu_epi8(base.add(upper) as *const i8);
                _mm512_storeu_epi8(base.add(lower) as *mut i8, $lane_reverse(high));
                _mm512_storeu_epi8(base.add(upper) as *mut i8, $lane_reverse(low));
            }
        }
    };
}

avx512_tier!(reverse_bytes_64, reverse_u8x64);
avx512_tier!(reverse_qwords_64, reverse_u64x8);
