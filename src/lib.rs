//! In-place array reversal for small fixed-size elements.
//!
//! Reversal walks a lower and an upper cursor toward the middle, swapping the widest blocks that
//! still fit and lane-reversing each block on the way: 64-, 32- and 16-byte SIMD shuffles where
//! the CPU has them, scalar byte swaps for one-byte elements, then single elements. Element bytes
//! are treated as opaque and are never reordered within an element.
//!
//! ```
//! let mut values = [1u16, 2, 3, 4, 5];
//! qreverse::reverse(&mut values);
//! assert_eq!(values, [5, 4, 3, 2, 1]);
//!
//! // Three-byte elements, viewed as raw bytes
//! let mut bytes = *b"abcdefghi";
//! qreverse::reverse_bytes(&mut bytes, 3);
//! assert_eq!(&bytes, b"ghidefabc");
//! ```
use std::mem::size_of;

use bytemuck::Pod;

use crate::options::Options;

pub mod bswap;
mod error;
mod kernels;
pub mod options;
mod schedule;
pub mod verify;

pub use crate::error::ReverseError;
pub use crate::options::SimdLevel;
pub use crate::schedule::{plan, Step};

/// Reverses `values` in place, using the widest SIMD tiers the running CPU supports.
///
/// The tiers come from the table for `size_of::<T>()` at the detected level, and each one runs
/// through its kernel's function pointer.
pub fn reverse<T: Pod>(values: &mut [T]) {
    reverse_with_options(values, &Options::default());
}

/// Reverses `values` in place, with the tiers chosen by `options`.
pub fn reverse_with_options<T: Pod>(values: &mut [T], options: &Options) {
    if size_of::<T>() == 0 {
        return;
    }
    let bytes: &mut [u8] = bytemuck::cast_slice_mut(values);
    let level = options.simd_level();
    tracing::trace!(len = bytes.len(), element_size = size_of::<T>(), %level, "reverse");
    // SAFETY: `simd_level` only returns supported levels, the size is non-zero and the byte view
    // of a `[T]` is a whole number of elements
    unsafe { schedule::execute(bytes, size_of::<T>(), level) };
}

/// Reverses `bytes` as a sequence of `element_size`-byte elements.
///
/// # Panics
///
/// Panics if `element_size` is zero or `bytes.len()` is not a multiple of it.
pub fn reverse_bytes(bytes: &mut [u8], element_size: usize) {
    if let Err(err) = try_reverse_bytes(bytes, element_size) {
        panic!("{err}");
    }
}

/// Reverses `bytes` as a sequence of `element_size`-byte elements.
///
/// Fails without touching `bytes` if `element_size` is zero or does not divide `bytes.len()`.
pub fn try_reverse_bytes(bytes: &mut [u8], element_size: usize) -> Result<(), ReverseError> {
    try_reverse_bytes_with_options(bytes, element_size, &Options::default())
}

/// Like [`try_reverse_bytes`], with the tiers chosen by `options`.
pub fn try_reverse_bytes_with_options(
    bytes: &mut [u8],
    element_size: usize,
    options: &Options,
) -> Result<(), ReverseError> {
    ReverseError::check(bytes.len(), element_size)?;
    let level = options.simd_level();
    tracing::trace!(len = bytes.len(), element_size, %level, "reverse");
    // SAFETY: `simd_level` only returns supported levels and the length was checked above
    unsafe { schedule::execute(bytes, element_size, level) };
    Ok(())
}
