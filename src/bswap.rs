//! Scalar byte-swap primitives
//!
//! These lower to a single `bswap`/`rev` instruction on every target Rust supports, and are used
//! by the one-byte schedule to reverse 8, 4 and 2 elements at a time without touching SIMD
//! registers.

/// Reverses the byte order of a 16-bit integer
#[inline(always)]
#[must_use]
pub const fn swap16(x: u16) -> u16 {
    x.swap_bytes()
}

/// Reverses the byte order of a 32-bit integer
#[inline(always)]
#[must_use]
pub const fn swap32(x: u32) -> u32 {
    x.swap_bytes()
}

/// Reverses the byte order of a 64-bit integer
#[inline(always)]
#[must_use]
pub const fn swap64(x: u64) -> u64 {
    x.swap_bytes()
}
