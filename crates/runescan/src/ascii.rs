//! ASCII fast paths shared by the scanner and the transcoder.
//!
//! Bulk reads are only issued over `chunks_exact` windows, so a read never
//! starts unless the whole window lies inside the caller's slice.

use core::mem::size_of;

const WORD: usize = size_of::<usize>();
const HIGH_BITS: usize = usize::from_ne_bytes([0x80; WORD]);

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "aarch64", target_feature = "neon")
))]
const BLOCK: usize = 32;

/// Number of leading ASCII bytes in `bytes`.
///
/// Skips two-vector blocks first, then machine words, then strips the
/// remaining ASCII bytes one at a time up to the first non-ASCII byte.
#[inline]
pub(crate) fn ascii_prefix_len(bytes: &[u8]) -> usize {
    let mut pos = vector_prefix_len(bytes);
    for word in bytes[pos..].chunks_exact(WORD) {
        let Ok(word) = <[u8; WORD]>::try_from(word) else {
            break;
        };
        if usize::from_ne_bytes(word) & HIGH_BITS != 0 {
            break;
        }
        pos += WORD;
    }
    pos + bytes[pos..].iter().take_while(|b| b.is_ascii()).count()
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn vector_prefix_len(bytes: &[u8]) -> usize {
    use core::arch::x86_64::{__m128i, _mm_loadu_si128, _mm_movemask_epi8, _mm_or_si128};

    let mut pos = 0;
    for block in bytes.chunks_exact(BLOCK) {
        // SAFETY: `block` is exactly `BLOCK` (32) bytes, so both unaligned
        // 16-byte loads stay inside it. SSE2 is enabled for this target.
        let mask = unsafe {
            let ptr = block.as_ptr();
            let lo = _mm_loadu_si128(ptr.cast::<__m128i>());
            let hi = _mm_loadu_si128(ptr.add(16).cast::<__m128i>());
            _mm_movemask_epi8(_mm_or_si128(lo, hi))
        };
        if mask != 0 {
            break;
        }
        pos += BLOCK;
    }
    pos
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
#[inline]
fn vector_prefix_len(bytes: &[u8]) -> usize {
    use core::arch::aarch64::{vld1q_u8, vmaxvq_u8, vorrq_u8};

    let mut pos = 0;
    for block in bytes.chunks_exact(BLOCK) {
        // SAFETY: `block` is exactly `BLOCK` (32) bytes, so both 16-byte
        // loads stay inside it. NEON is enabled for this target.
        let max = unsafe {
            let ptr = block.as_ptr();
            vmaxvq_u8(vorrq_u8(vld1q_u8(ptr), vld1q_u8(ptr.add(16))))
        };
        if max >= 0x80 {
            break;
        }
        pos += BLOCK;
    }
    pos
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
#[inline]
fn vector_prefix_len(_bytes: &[u8]) -> usize {
    0
}

/// Widens ASCII bytes into UTF-16 code units; copies `min(src, dst)` units.
#[inline]
pub(crate) fn widen_ascii(src: &[u8], dst: &mut [u16]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = u16::from(s);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn stops_at_every_position() {
        for len in 0..100 {
            for bad in 0..len {
                let mut buf = vec![b'a'; len];
                buf[bad] = 0xC3;
                assert_eq!(ascii_prefix_len(&buf), bad, "len {len}, bad {bad}");
            }
            assert_eq!(ascii_prefix_len(&vec![b'z'; len]), len);
        }
    }

    #[test]
    fn unaligned_starts() {
        let mut buf = vec![b'x'; 200];
        buf[150] = 0x80;
        for start in 0..40 {
            assert_eq!(ascii_prefix_len(&buf[start..]), 150 - start);
        }
    }

    #[test]
    fn never_looks_past_the_slice() {
        let mut buf = vec![b'q'; 96];
        buf.extend_from_slice(&[0xFF; 64]);
        for len in 0..=96 {
            assert_eq!(ascii_prefix_len(&buf[..len]), len);
        }
    }

    #[test]
    fn widen_copies_the_shorter_length() {
        let mut dst = [0u16; 3];
        widen_ascii(b"hello", &mut dst);
        assert_eq!(dst, [u16::from(b'h'), u16::from(b'e'), u16::from(b'l')]);
    }
}
