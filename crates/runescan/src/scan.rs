//! Bulk scanner: first invalid offset, rune count and surrogate-pair count in
//! one left-to-right pass.

use crate::{Error, ascii::ascii_prefix_len, classify::decode_multibyte};

/// Outcome of [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult {
    /// Offset of the first byte of the first invalid or truncated sequence,
    /// or `None` if the whole buffer is well-formed.
    pub first_invalid: Option<usize>,
    /// Scalar values decoded before `first_invalid` (or in the whole buffer).
    pub runes: usize,
    /// How many of those scalars were four-byte sequences, i.e. need a UTF-16
    /// surrogate pair.
    pub surrogate_pairs: usize,
}

impl ScanResult {
    /// `true` if the scanned buffer is entirely well-formed.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.first_invalid.is_none()
    }

    /// UTF-16 code units needed for the runes counted so far.
    #[must_use]
    pub const fn utf16_len(&self) -> usize {
        self.runes + self.surrogate_pairs
    }
}

/// Scans `bytes` for the first invalid UTF-8 sequence, counting runes and
/// surrogate pairs along the way.
///
/// A sequence truncated by the end of the buffer counts as invalid here;
/// callers that expect more input should use [`crate::Utf8Checker`].
///
/// ```rust
/// use runescan::scan;
///
/// let result = scan(&[0x58, 0xC3, 0xA9, 0xE2, 0x82, 0xAC]);
/// assert_eq!(result.first_invalid, None);
/// assert_eq!((result.runes, result.surrogate_pairs), (3, 0));
///
/// let result = scan(b"ab\xF0\x9F\x98\x8A\xFFcd");
/// assert_eq!(result.first_invalid, Some(6));
/// assert_eq!((result.runes, result.surrogate_pairs), (3, 1));
/// ```
#[must_use]
pub fn scan(bytes: &[u8]) -> ScanResult {
    let len = bytes.len();
    // Every byte is provisionally one rune; multi-byte sequences give back
    // `seq_len - 1` each.
    let mut runes = len;
    let mut surrogate_pairs = 0;
    let mut pos = 0;

    loop {
        pos += ascii_prefix_len(&bytes[pos..]);
        if pos == len {
            return ScanResult {
                first_invalid: None,
                runes,
                surrogate_pairs,
            };
        }

        // Consecutive multi-byte sequences are common in non-Latin text, so
        // stay here until the next ASCII byte.
        while let Some(&lead) = bytes.get(pos) {
            if lead < 0x80 {
                break;
            }
            match decode_multibyte(&bytes[pos..]) {
                Ok((_, seq_len)) => {
                    runes -= seq_len - 1;
                    if seq_len == 4 {
                        surrogate_pairs += 1;
                    }
                    pos += seq_len;
                }
                Err(_) => {
                    // Bytes from `pos` on were never attributed to a rune.
                    return ScanResult {
                        first_invalid: Some(pos),
                        runes: runes - (len - pos),
                        surrogate_pairs,
                    };
                }
            }
        }
    }
}

/// `true` if all of `bytes` is well-formed UTF-8.
#[must_use]
pub fn is_well_formed(bytes: &[u8]) -> bool {
    scan(bytes).first_invalid.is_none()
}

/// Number of UTF-16 code units `bytes` transcodes to.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] with the offset of the first invalid byte.
pub fn utf16_len(bytes: &[u8]) -> Result<usize, Error> {
    let result = scan(bytes);
    match result.first_invalid {
        None => Ok(result.utf16_len()),
        Some(offset) => Err(Error::InvalidData { offset }),
    }
}

/// Validates `bytes` and borrows them as `&str`.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] with the offset of the first invalid byte.
pub fn validate(bytes: &[u8]) -> Result<&str, Error> {
    if let Some(offset) = scan(bytes).first_invalid {
        return Err(Error::InvalidData { offset });
    }
    // The scanner accepts exactly the language `core::str::from_utf8` does.
    core::str::from_utf8(bytes).map_err(|e| Error::InvalidData {
        offset: e.valid_up_to(),
    })
}
