//! Portable kernels
//!
//! The byte-swap tiers reverse 8, 4 or 2 one-byte elements per side with a single scalar
//! `bswap`. They must never be used for wider elements, since they would also reverse the bytes
//! inside each element.
use crate::bswap::{swap16, swap32, swap64};
use crate::kernels::Cursor;

macro_rules! bswap_tier {
    ($func_name:ident, $int:ty, $swap:ident) => {
        #[doc = concat!(
            "Reverses `size_of::<",
            stringify!($int),
            ">()` one-byte elements per side with a scalar byte swap."
        )]
        pub(crate) fn $func_name(bytes: &mut [u8], cursor: &mut Cursor) {
            const WIDTH: usize = std::mem::size_of::<$int>();
            debug_assert_eq!(cursor.element_size(), 1);

            while let Some((lower, upper)) = cursor.take(WIDTH) {
                let (head, tail) = bytes.split_at_mut(upper);
                let low_block = &mut head[lower..lower + WIDTH];
                let high_block = &mut tail[..WIDTH];

                let mut a = [0u8; WIDTH];
                let mut b = [0u8; WIDTH];
                a.copy_from_slice(low_block);
                b.copy_from_slice(high_block);

                low_block.copy_from_slice(&$swap(<$int>::from_ne_bytes(b)).to_ne_bytes());
                high_block.copy_from_slice(&$swap(<$int>::from_ne_bytes(a)).to_ne_bytes());
            }
        }
    };
}

bswap_tier!(reverse_bswap_64, u64, swap64);
bswap_tier!(reverse_bswap_32, u32, swap32);
bswap_tier!(reverse_bswap_16, u16, swap16);

/// Swaps single `S`-byte elements through a stack scratch of exactly `S` bytes.
///
/// This is the tail of every specialized schedule.
pub(crate) fn reverse_elements<const S: usize>(bytes: &mut [u8], cursor: &mut Cursor) {
    debug_assert_eq!(cursor.element_size(), S);

    while let Some((lower, upper)) = cursor.take(S) {
        let mut scratch = [0u8; S];
        scratch.copy_from_slice(&bytes[lower..lower + S]);
        bytes.copy_within(upper..upper + S, lower);
        bytes[upper..upper + S].copy_from_slice(&scratch);
    }
}

/// Generic block swap for element sizes without a specialization.
///
/// The element size is only known at runtime here, so the two blocks are exchanged directly with
/// a non-overlapping slice swap rather than through a scratch array.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub(crate) fn reverse_blocks(bytes: &mut [u8], cursor: &mut Cursor) {
    let size = cursor.element_size();

    while let Some((lower, upper)) = cursor.take(size) {
        let (head, tail) = bytes.split_at_mut(upper);
        head[lower..lower + size].swap_with_slice(&mut tail[..size]);
    }
}
