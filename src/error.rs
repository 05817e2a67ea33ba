//! Errors reported at the byte-slice boundary

use thiserror::Error;

/// Reasons a byte slice cannot be viewed as a sequence of whole elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReverseError {
    /// Elements must be at least one byte wide
    #[error("element size must be non-zero")]
    ZeroElementSize,

    /// The slice ends part-way through an element
    #[error("byte length {len} is not a multiple of the element size {element_size}")]
    RaggedLength { len: usize, element_size: usize },
}

impl ReverseError {
    pub(crate) fn check(len: usize, element_size: usize) -> Result<(), ReverseError> {
        if element_size == 0 {
            return Err(ReverseError::ZeroElementSize);
        }
        if len % element_size != 0 {
            return Err(ReverseError::RaggedLength { len, element_size });
        }
        Ok(())
    }
}
