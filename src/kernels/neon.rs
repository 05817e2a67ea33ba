//! 16-byte aarch64 kernels (NEON)
//!
//! `rev64` reverses lanes inside each 64-bit half and `ext #8` exchanges the halves; together
//! they reverse the whole register at any lane width up to 8 bytes.

use core::arch::aarch64::*;

use crate::kernels::Cursor;

const WIDTH: usize = 16;

#[target_feature(enable = "neon")]
#[inline]
unsafe fn swap_halves(v: uint8x16_t) -> uint8x16_t {
    vextq_u8::<8>(v, v)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn reverse_u8x16(v: uint8x16_t) -> uint8x16_t {
    swap_halves(vrev64q_u8(v))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn reverse_u16x8(v: uint8x16_t) -> uint8x16_t {
    swap_halves(vreinterpretq_u8_u16(vrev64q_u16(vreinterpretq_u16_u8(v))))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn reverse_u32x4(v: uint8x16_t) -> uint8x16_t {
    swap_halves(vreinterpretq_u8_u32(vrev64q_u32(vreinterpretq_u32_u8(v))))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn reverse_u64x2(v: uint8x16_t) -> uint8x16_t {
    swap_halves(v)
}

macro_rules! neon_tier {
    ($func_name:ident, $lane_reverse:ident) => {
        /// # Safety
        ///
        /// `cursor` must span `bytes`, and the CPU must support NEON.
        #[target_feature(enable = "neon")]
        pub(crate) unsafe fn $func_name(bytes: &mut [u8], cursor: &mut Cursor) {
            debug_assert_eq!(WIDTH % cursor.element_size(), 0);
            debug_assert!(cursor.remaining().1 <= bytes.len());
            let base = bytes.as_mut_ptr();

            while let Some((lower, upper)) = cursor.take(WIDTH) {
                let low = vld1q_u8(base.add(lower));
                let high = vld1q_u8(base.add(upper));
                vst1q_u8(base.add(lower), $lane_reverse(high));
                vst1q_u8(base.add(upper), $lane_reverse(low));
            }
        }
    };
}

neon_tier!(reverse_bytes_16, reverse_u8x16);
neon_tier!(reverse_words_16, reverse_u16x8);
neon_tier!(reverse_dwords_16, reverse_u32x4);
neon_tier!(reverse_qwords_16, reverse_u64x2);
