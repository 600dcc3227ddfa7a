use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// Boundaries are placed on byte offsets with no regard for sequence
/// boundaries, which is exactly what a [`crate::Utf8Checker`] has to cope
/// with.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    if payload.is_empty() {
        return Vec::new();
    }
    let chunk_size = payload.len().div_ceil(parts);
    payload.chunks(chunk_size).collect()
}

/// Return a sequence of prefixes converging to `payload`.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    let chunks = produce_chunks(payload, parts);
    let mut prefixes = Vec::with_capacity(chunks.len());
    let mut end = 0;
    for chunk in chunks {
        end += chunk.len();
        prefixes.push(&payload[..end]);
    }
    prefixes
}

/// Split `payload` at arbitrary offsets.
///
/// Each entry of `splits` is reduced modulo the remaining length to pick the
/// next chunk size (at least one byte), so any sequence of integers yields a
/// valid partition. Whatever remains after `splits` is exhausted becomes the
/// last chunk.
#[must_use]
pub fn split_at_points<'a>(payload: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(splits.len() + 1);
    let mut rest = payload;
    for &s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(1 + s % rest.len());
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
