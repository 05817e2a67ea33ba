//! 32-byte x86 kernels (AVX2)
//!
//! `vpshufb` only shuffles inside each 128-bit half, so the byte and word kernels reverse within
//! the halves first and then exchange the halves. Dword and qword lanes are reversed with a
//! single full-width permute.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::kernels::Cursor;

const WIDTH: usize = 32;

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn swap_halves(v: __m256i) -> __m256i {
    _mm256_permute2x128_si256::<0x01>(v, v)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn reverse_u8x32(v: __m256i) -> __m256i {
    #[rustfmt::skip]
    let mask = _mm256_setr_epi8(
        15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
        15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
    );
    swap_halves(_mm256_shuffle_epi8(v, mask))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn reverse_u16x16(v: __m256i) -> __m256i {
    #[rustfmt::skip]
    let mask = _mm256_setr_epi8(
        14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1,
        14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1,
    );
    swap_halves(_mm256_shuffle_epi8(v, mask))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn reverse_u32x8(v: __m256i) -> __m256i {
    _mm256_permutevar8x32_epi32(v, _mm256_setr_epi32(7, 6, 5, 4, 3, 2, 1, 0))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn reverse_u64x4(v: __m256i) -> __m256i {
    _mm256_permute4x64_epi64::<0b00_01_10_11>(v)
}

macro_rules! avx2_tier {
    ($func_name:ident, $lane_reverse:ident) => {
        /// # Safety
        ///
        /// `cursor` must span `bytes`, and the CPU must support AVX2.
        #[target_feature(enable = "avx2")]
        pub(crate) unsafe fn $func_name(bytes: &mut [u8], cursor: &mut Cursor) {
            debug_assert_eq!(WIDTH % cursor.element_size(), 0);
            debug_assert!(cursor.remaining().1 <= bytes.len());
            let base = bytes.as_mut_ptr();

            while let Some((lower, upper)) = cursor.take(WIDTH) {
                let low = _mm256_loadu_si256(base.add(lower) as *const __m256i);
                let high = _mm256_loadu_si256(base.add(upper) as *const __m256i);
                _mm256_storeu_si256(base.add(lower) as *mut __m256i, $lane_reverse(high));
                _mm256_storeu_si256(base.add(upper) as *mut __m256i, $lane_reverse(low));
            }
        }
    };
}

avx2_tier!(reverse_bytes_32, reverse_u8x32);
avx2_tier!(reverse_words_32, reverse_u16x16);
avx2_tier!(reverse_dwords_32, reverse_u32x8);
avx2_tier!(reverse_qwords_32, reverse_u64x4);

/// Reverses eight qwords per side using a pair of ymm registers per block.
///
/// Reversing a 64-byte block means reversing each 32-byte half and exchanging the halves, so the
/// second half of one block lands at the start of the other.
///
/// # Safety
///
/// `cursor` must span `bytes`, and the CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn reverse_qwords_64(bytes: &mut [u8], cursor: &mut Cursor) {
    debug_assert_eq!(cursor.element_size(), 8);
    debug_assert!(cursor.remaining().1 <= bytes.len());
    let base = bytes.as_mut_ptr();

    while let Some((lower, upper)) = cursor.take(2 * WIDTH) {
        let low_0 = _mm256_loadu_si256(base.add(lower) as *const __m256i);
        let low_1 = _mm256_loadu_si256(base.add(lower + WIDTH) as *const __m256i);
        let high_0 = _mm256_loadu_si256(base.add(upper) as *const __m256i);
        let high_1 = _mm256_loadu_si256(base.add(upper + WIDTH) as *const __m256i);
        _mm256_storeu_si256(base.add(lower) as *mut __m256i, reverse_u64x4(high_1));
        _mm256_storeu_si256(
            base.add(lower + WIDTH) as *mut __m256i,
            reverse_u64x4(high_0),
        );
        _mm256_storeu_si256(base.add(upper) as *mut __m256i, reverse_u64x4(low_1));
        _mm256_storeu_si256(
            base.add(upper + WIDTH) as *mut __m256i,
            reverse_u64x4(low_0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avx2() -> bool {
        std::arch::is_x86_feature_detected!("avx2")
    }

    /// Reverses `len` bytes of `0, 1, 2, ...` as `element_size`-byte elements with one tier only
    fn run(drain: unsafe fn(&mut [u8], &mut Cursor), element_size: usize, len: usize) -> Vec<u8> {
        let mut bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let mut cursor = Cursor::new(len, element_size);
        unsafe { drain(&mut bytes, &mut cursor) };
        bytes
    }

    fn reversed_elements(len: usize, element_size: usize) -> Vec<u8> {
        let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
        bytes
            .chunks_exact(element_size)
            .rev()
            .flatten()
            .copied()
            .collect()
    }

    #[test]
    fn full_width_pairs() {
        if !avx2() {
            return;
        }
        assert_eq!(run(reverse_bytes_32, 1, 64), reversed_elements(64, 1));
        assert_eq!(run(reverse_words_32, 2, 64), reversed_elements(64, 2));
        assert_eq!(run(reverse_dwords_32, 4, 64), reversed_elements(64, 4));
        assert_eq!(run(reverse_qwords_32, 8, 64), reversed_elements(64, 8));
        assert_eq!(run(reverse_qwords_64, 8, 128), reversed_elements(128, 8));
    }

    #[test]
    fn repeated_steps() {
        if !avx2() {
            return;
        }
        // 8 blocks of 32 bytes, 4 steps, nothing left in the middle
        assert_eq!(run(reverse_bytes_32, 1, 256), reversed_elements(256, 1));
        assert_eq!(run(reverse_qwords_64, 8, 256), reversed_elements(256, 8));
    }

    #[test]
    fn stops_with_unreversed_middle() {
        if !avx2() {
            return;
        }
        let bytes = run(reverse_dwords_32, 4, 96);
        let full = reversed_elements(96, 4);
        let original: Vec<u8> = (0..96).collect();
        assert_eq!(&bytes[..32], &full[..32]);
        assert_eq!(&bytes[32..64], &original[32..64]);
        assert_eq!(&bytes[64..], &full[64..]);
    }
}
