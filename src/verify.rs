//! Helpers for checking a reversal against its input, shared by the `qreverse` binary and tests

/// Builds `count` elements of `element_size` bytes where every byte of element `i` is `i % 256`
pub fn seed_pattern(count: usize, element_size: usize) -> Vec<u8> {
    (0..count)
        .flat_map(|i| std::iter::repeat(i as u8).take(element_size))
        .collect()
}

/// Index of the first element of `reversed` that differs from the mirrored element of
/// `original`, or `None` if `reversed` is the element-wise reverse of `original`.
///
/// # Panics
///
/// Panics if the slices differ in length, or `element_size` is zero or does not divide their
/// length.
pub fn first_mismatch(original: &[u8], reversed: &[u8], element_size: usize) -> Option<usize> {
    assert_eq!(original.len(), reversed.len());
    assert!(element_size > 0 && original.len() % element_size == 0);

    original
        .chunks_exact(element_size)
        .rev()
        .zip(reversed.chunks_exact(element_size))
        .position(|(expected, actual)| expected != actual)
}
