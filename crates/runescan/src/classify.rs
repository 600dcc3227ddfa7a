//! Single-sequence classification.
//!
//! Everything in this crate that decides whether bytes are valid UTF-8 goes
//! through [`decode_multibyte`], which walks the well-formed byte ranges of
//! Unicode Table 3-7 one byte at a time:
//!
//! | lead        | 2nd         | 3rd         | 4th         |
//! |-------------|-------------|-------------|-------------|
//! | `C2..=DF`   | `80..=BF`   |             |             |
//! | `E0`        | `A0..=BF`   | `80..=BF`   |             |
//! | `E1..=EC`   | `80..=BF`   | `80..=BF`   |             |
//! | `ED`        | `80..=9F`   | `80..=BF`   |             |
//! | `EE..=EF`   | `80..=BF`   | `80..=BF`   |             |
//! | `F0`        | `90..=BF`   | `80..=BF`   | `80..=BF`   |
//! | `F1..=F3`   | `80..=BF`   | `80..=BF`   | `80..=BF`   |
//! | `F4`        | `80..=8F`   | `80..=BF`   | `80..=BF`   |
//!
//! The restricted second-byte ranges are checked by decoding the partial
//! scalar from the first two bytes, so an overlong, surrogate or out-of-range
//! sequence is blamed on both of its first two bytes.

use crate::Scalar;

/// Classification of the leading sequence of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The buffer was empty.
    Empty,
    /// A complete, well-formed sequence encoding the given scalar.
    WellFormed(Scalar),
    /// A valid prefix of a sequence that was cut off by the end of the buffer.
    Incomplete,
    /// The leading bytes can never begin a well-formed sequence.
    Invalid,
}

/// The verdict for the first sequence of a buffer and how many bytes it
/// covers.
///
/// For [`Verdict::Invalid`] `consumed` is the number of bytes that should be
/// reported (or replaced) as one error; for [`Verdict::Incomplete`] it is the
/// length of the truncated prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstSequence {
    /// What the leading bytes are.
    pub verdict: Verdict,
    /// Bytes covered by the verdict, `0..=4`.
    pub consumed: usize,
}

impl FirstSequence {
    /// The decoded scalar, when the sequence is well-formed.
    #[must_use]
    pub const fn scalar(&self) -> Option<Scalar> {
        match self.verdict {
            Verdict::WellFormed(s) => Some(s),
            _ => None,
        }
    }

    /// `true` if the leading sequence decoded to a scalar.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        matches!(self.verdict, Verdict::WellFormed(_))
    }
}

/// Why [`decode_multibyte`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rejection {
    /// Bytes attributed to the failure.
    pub consumed: usize,
    /// The input ended inside an otherwise valid prefix.
    pub incomplete: bool,
}

impl Rejection {
    const fn invalid(consumed: usize) -> Self {
        Self {
            consumed,
            incomplete: false,
        }
    }

    const fn incomplete(consumed: usize) -> Self {
        Self {
            consumed,
            incomplete: true,
        }
    }
}

#[inline]
pub(crate) const fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Length of the sequence a lead byte introduces, or `None` for bytes that
/// can never start a well-formed sequence.
#[must_use]
pub const fn expected_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decodes the sequence at the front of `bytes`, whose first byte the caller
/// has already found to be non-ASCII (or absent).
///
/// Returns the scalar and the sequence length on success.
#[inline]
pub(crate) fn decode_multibyte(bytes: &[u8]) -> Result<(Scalar, usize), Rejection> {
    let [b0, rest @ ..] = bytes else {
        return Err(Rejection::incomplete(0));
    };
    let b0 = *b0;
    if !(0xC2..=0xF4).contains(&b0) {
        return Err(Rejection::invalid(1));
    }
    let Some(&b1) = rest.first() else {
        return Err(Rejection::incomplete(1));
    };
    if !is_continuation(b1) {
        return Err(Rejection::invalid(1));
    }

    if b0 < 0xE0 {
        let v = (u32::from(b0 & 0x1F) << 6) | u32::from(b1 & 0x3F);
        return Ok((Scalar::from_u32_unchecked(v), 2));
    }

    if b0 < 0xF0 {
        let partial = (u32::from(b0 & 0x0F) << 12) | (u32::from(b1 & 0x3F) << 6);
        if partial < 0x800 || (0xD800..=0xDFFF).contains(&partial) {
            return Err(Rejection::invalid(2));
        }
        let Some(&b2) = rest.get(1) else {
            return Err(Rejection::incomplete(2));
        };
        if !is_continuation(b2) {
            return Err(Rejection::invalid(2));
        }
        let v = partial | u32::from(b2 & 0x3F);
        return Ok((Scalar::from_u32_unchecked(v), 3));
    }

    let partial = (u32::from(b0 & 0x07) << 18) | (u32::from(b1 & 0x3F) << 12);
    if !(0x1_0000..=0x10_FFFF).contains(&partial) {
        return Err(Rejection::invalid(2));
    }
    let Some(&b2) = rest.get(1) else {
        return Err(Rejection::incomplete(2));
    };
    if !is_continuation(b2) {
        return Err(Rejection::invalid(2));
    }
    let Some(&b3) = rest.get(2) else {
        return Err(Rejection::incomplete(3));
    };
    if !is_continuation(b3) {
        return Err(Rejection::invalid(3));
    }
    let v = partial | (u32::from(b2 & 0x3F) << 6) | u32::from(b3 & 0x3F);
    Ok((Scalar::from_u32_unchecked(v), 4))
}

/// Classifies the first UTF-8 sequence of `bytes`.
///
/// The number of bytes reported for an invalid sequence follows the "maximal
/// subpart" convention of standard UTF-8 decoders, extended so that an
/// overlong, surrogate or out-of-range pair of lead bytes is reported as one
/// two-byte error:
///
/// ```rust
/// use runescan::{Verdict, peek_first_sequence};
///
/// let first = peek_first_sequence(&[0xE0, 0x80]);
/// assert_eq!(first.verdict, Verdict::Invalid);
/// assert_eq!(first.consumed, 2);
///
/// let first = peek_first_sequence("€uro".as_bytes());
/// assert_eq!(first.scalar().map(char::from), Some('€'));
/// assert_eq!(first.consumed, 3);
/// ```
#[must_use]
pub fn peek_first_sequence(bytes: &[u8]) -> FirstSequence {
    match bytes.first() {
        None => FirstSequence {
            verdict: Verdict::Empty,
            consumed: 0,
        },
        Some(&b) if b < 0x80 => FirstSequence {
            verdict: Verdict::WellFormed(Scalar::from_u32_unchecked(u32::from(b))),
            consumed: 1,
        },
        Some(_) => match decode_multibyte(bytes) {
            Ok((scalar, consumed)) => FirstSequence {
                verdict: Verdict::WellFormed(scalar),
                consumed,
            },
            Err(Rejection {
                consumed,
                incomplete,
            }) => FirstSequence {
                verdict: if incomplete {
                    Verdict::Incomplete
                } else {
                    Verdict::Invalid
                },
                consumed,
            },
        },
    }
}

/// Length of the invalid run at the front of `bytes`.
///
/// A truncated sequence can only be reported at the end of the buffer, where
/// nothing can complete it; it is treated as one run covering the remaining
/// bytes. Returns 0 when `bytes` starts with a well-formed sequence.
pub(crate) fn invalid_run_len(bytes: &[u8]) -> usize {
    let first = peek_first_sequence(bytes);
    match first.verdict {
        Verdict::Invalid => first.consumed,
        Verdict::Incomplete => bytes.len(),
        Verdict::Empty | Verdict::WellFormed(_) => 0,
    }
}
