use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Bytes written around a buffer under test to catch out-of-bounds stores
pub const GUARD: [u8; 32] = [0xA5; 32];

/// Fill `buf` with bytes from a generator seeded with `seed`
pub fn fill_random(buf: &mut [u8], seed: u64) {
    StdRng::seed_from_u64(seed).fill_bytes(buf);
}

/// Generate `len` random bytes, reproducible for a given `seed`
pub fn gen_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut buf = vec![0; len];
    fill_random(&mut buf, seed);
    buf
}

/// Element-wise reverse of `bytes`, one element at a time, into a new buffer
///
/// # Panics
///
/// Panics if `element_size` is zero or does not divide `bytes.len()`
pub fn reverse_elements_naive(bytes: &[u8], element_size: usize) -> Vec<u8> {
    assert!(element_size > 0 && bytes.len() % element_size == 0);
    bytes
        .chunks_exact(element_size)
        .rev()
        .flatten()
        .copied()
        .collect()
}

/// Surround `payload` with [`GUARD`] bytes on both sides
pub fn framed(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 2 * GUARD.len());
    buf.extend_from_slice(&GUARD);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&GUARD);
    buf
}

/// The payload of a buffer built by [`framed`]
pub fn payload_mut(buf: &mut [u8]) -> &mut [u8] {
    let end = buf.len() - GUARD.len();
    &mut buf[GUARD.len()..end]
}

/// Asserts that both guard regions of a [`framed`] buffer are intact.
///
/// # Panics
///
/// Panics if any guard byte was overwritten
#[track_caller]
pub fn assert_guards_intact(buf: &[u8]) {
    let (head, rest) = buf.split_at(GUARD.len());
    let tail = &rest[rest.len() - GUARD.len()..];
    assert_eq!(head, GUARD, "leading guard overwritten");
    assert_eq!(tail, GUARD, "trailing guard overwritten");
}

/// Asserts that `reversed` is `original` with its `element_size`-byte elements in reverse order.
///
/// # Panics
///
/// Panics with the first misplaced element index if it is not
#[track_caller]
pub fn assert_reversed(original: &[u8], reversed: &[u8], element_size: usize) {
    assert_eq!(original.len(), reversed.len(), "length changed");
    let expected = reverse_elements_naive(original, element_size);
    if let Some(i) = expected
        .chunks_exact(element_size)
        .zip(reversed.chunks_exact(element_size))
        .position(|(e, a)| e != a)
    {
        panic!(
            "element {i} of {} misplaced (S = {element_size}): expected {:?}, found {:?}",
            original.len() / element_size,
            &expected[i * element_size..(i + 1) * element_size],
            &reversed[i * element_size..(i + 1) * element_size],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_bytes_repeat() {
        assert_eq!(gen_random_bytes(100, 7), gen_random_bytes(100, 7));
        assert_ne!(gen_random_bytes(100, 7), gen_random_bytes(100, 8));
    }

    #[test]
    fn naive_reverse() {
        assert_eq!(reverse_elements_naive(b"abcdef", 2), b"efcdab");
        assert_eq!(reverse_elements_naive(b"abcdef", 3), b"defabc");
        assert_eq!(reverse_elements_naive(b"", 5), b"");
    }

    #[test]
    fn framing() {
        let mut buf = framed(b"xyz");
        assert_eq!(buf.len(), 3 + 2 * GUARD.len());
        payload_mut(&mut buf).copy_from_slice(b"zyx");
        assert_guards_intact(&buf);
        assert_eq!(payload_mut(&mut buf), b"zyx");
    }

    #[test]
    #[should_panic(expected = "trailing guard overwritten")]
    fn detects_overrun() {
        let mut buf = framed(b"xyz");
        buf[GUARD.len() + 3] = 0;
        assert_guards_intact(&buf);
    }

    #[test]
    #[should_panic(expected = "element 1 of 3 misplaced")]
    fn reports_misplaced_element() {
        assert_reversed(b"aabbcc", b"ccaabb", 2);
    }
}
