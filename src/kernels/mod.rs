//! Reversal Kernels
//!
//! Each kernel drains one tier of the staircase: it keeps swapping a lower and an upper block of
//! its width, lane-reversed, until the unreversed middle is too small for two such blocks.
//!
//! ## Organization
//!
//! - `portable`: scalar byte swaps for one-byte elements, and the element/block swaps every
//!   schedule ends with
//! - `sse`, `avx2`, `avx512`: x86 shuffles and permutes at 16, 32 and 64 bytes
//! - `neon`: aarch64 `rev`/`ext` sequences at 16 bytes
//!
//! SIMD kernels are `unsafe` and must only run after the matching [`SimdLevel`] was found to be
//! supported.
//!
//! [`SimdLevel`]: crate::options::SimdLevel

pub(crate) mod portable;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod avx2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod avx512;
#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod sse;

/// Drains one tier over `bytes`, advancing `cursor`.
///
/// # Safety
///
/// `cursor` must have been created for `bytes`, and the CPU must support the instructions the
/// kernel was compiled for.
pub(crate) type Drain = unsafe fn(&mut [u8], &mut Cursor);

/// The pair of converging byte offsets shared by every tier of one reversal.
///
/// `lower` only grows and `upper` only shrinks, both by whole blocks, so as long as every width
/// is a multiple of the element size they stay element-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cursor {
    lower: usize,
    upper: usize,
    element_size: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize, element_size: usize) -> Self {
        debug_assert!(element_size > 0 && len % element_size == 0);
        Cursor {
            lower: 0,
            upper: len,
            element_size,
        }
    }

    /// Claims the next pair of `width`-byte blocks.
    ///
    /// Returns the start offsets of the lower and the upper block. A step is only taken while the
    /// middle holds at least two full blocks, so the blocks never overlap.
    #[inline(always)]
    pub(crate) fn take(&mut self, width: usize) -> Option<(usize, usize)> {
        if self.upper - self.lower >= 2 * width {
            let lower = self.lower;
            self.lower += width;
            self.upper -= width;
            Some((lower, self.upper))
        } else {
            None
        }
    }

    #[inline(always)]
    pub(crate) fn element_size(&self) -> usize {
        self.element_size
    }

    /// Byte offsets of the unreversed middle, `lower..upper`
    pub(crate) fn remaining(&self) -> (usize, usize) {
        (self.lower, self.upper)
    }
}
