use core::fmt;

use crate::Error;

const SURROGATE_FIRST: u32 = 0xD800;
const SURROGATE_LAST: u32 = 0xDFFF;
const HIGH_SURROGATE_LAST: u32 = 0xDBFF;
const MAX_SCALAR: u32 = 0x10_FFFF;

/// A Unicode scalar value: any code point in `[U+0000, U+D7FF]` or
/// `[U+E000, U+10FFFF]`.
///
/// Unlike `char`, a `Scalar` is the unit the decoders in this crate produce
/// and it exposes the code-unit counts needed to size UTF-8 and UTF-16 output
/// buffers up front.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Scalar(u32);

impl Scalar {
    /// `U+FFFD REPLACEMENT CHARACTER`.
    pub const REPLACEMENT: Scalar = Scalar(0xFFFD);

    /// The largest scalar value, `U+10FFFF`.
    pub const MAX: Scalar = Scalar(MAX_SCALAR);

    /// Builds a scalar from an unvalidated integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is a surrogate code point or
    /// is greater than `0x10FFFF`.
    pub const fn from_u32(value: u32) -> Result<Self, Error> {
        if is_scalar(value) {
            Ok(Scalar(value))
        } else {
            Err(Error::OutOfRange(value))
        }
    }

    /// Builds a scalar from a single UTF-16 code unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `unit` is a high or low surrogate.
    pub const fn from_utf16_code_unit(unit: u16) -> Result<Self, Error> {
        Self::from_u32(unit as u32)
    }

    /// Combines a UTF-16 surrogate pair into the scalar it encodes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] carrying the offending unit if `high` is
    /// not a high surrogate or `low` is not a low surrogate.
    pub const fn from_utf16_pair(high: u16, low: u16) -> Result<Self, Error> {
        let (high, low) = (high as u32, low as u32);
        if high < SURROGATE_FIRST || high > HIGH_SURROGATE_LAST {
            return Err(Error::OutOfRange(high));
        }
        if low <= HIGH_SURROGATE_LAST || low > SURROGATE_LAST {
            return Err(Error::OutOfRange(low));
        }
        Ok(Scalar(
            0x1_0000 + ((high - SURROGATE_FIRST) << 10) + (low - (HIGH_SURROGATE_LAST + 1)),
        ))
    }

    /// Caller guarantees `value` is a scalar value.
    pub(crate) const fn from_u32_unchecked(value: u32) -> Self {
        debug_assert!(is_scalar(value));
        Scalar(value)
    }

    /// The numeric value of this scalar.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// `true` for `U+0000..=U+007F`.
    #[must_use]
    pub const fn is_ascii(self) -> bool {
        self.0 < 0x80
    }

    /// Number of UTF-16 code units needed to encode this scalar (1 or 2).
    #[must_use]
    pub const fn utf16_len(self) -> usize {
        if self.0 < 0x1_0000 { 1 } else { 2 }
    }

    /// Number of UTF-8 bytes needed to encode this scalar (1 through 4).
    #[must_use]
    pub const fn utf8_len(self) -> usize {
        match self.0 {
            0..0x80 => 1,
            0x80..0x800 => 2,
            0x800..0x1_0000 => 3,
            _ => 4,
        }
    }

    /// Writes the UTF-16 encoding to the front of `out` and returns the number
    /// of code units written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] without writing anything if `out` is
    /// shorter than [`Scalar::utf16_len`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_utf16(self, out: &mut [u16]) -> Result<usize, Error> {
        let v = self.0;
        let available = out.len();
        match out {
            [first, ..] if v < 0x1_0000 => {
                *first = v as u16;
                Ok(1)
            }
            [high, low, ..] => {
                let v = v - 0x1_0000;
                *high = (SURROGATE_FIRST + (v >> 10)) as u16;
                *low = (HIGH_SURROGATE_LAST + 1 + (v & 0x3FF)) as u16;
                Ok(2)
            }
            _ => Err(Error::BufferTooSmall {
                needed: self.utf16_len(),
                available,
            }),
        }
    }

    /// Writes the UTF-8 encoding to the front of `out` and returns the number
    /// of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] without writing anything if `out` is
    /// shorter than [`Scalar::utf8_len`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_utf8(self, out: &mut [u8]) -> Result<usize, Error> {
        let v = self.0;
        let len = self.utf8_len();
        let Some(dst) = out.get_mut(..len) else {
            return Err(Error::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        };
        match dst {
            [a] => *a = v as u8,
            [a, b] => {
                *a = 0xC0 | (v >> 6) as u8;
                *b = 0x80 | (v & 0x3F) as u8;
            }
            [a, b, c] => {
                *a = 0xE0 | (v >> 12) as u8;
                *b = 0x80 | ((v >> 6) & 0x3F) as u8;
                *c = 0x80 | (v & 0x3F) as u8;
            }
            [a, b, c, d] => {
                *a = 0xF0 | (v >> 18) as u8;
                *b = 0x80 | ((v >> 12) & 0x3F) as u8;
                *c = 0x80 | ((v >> 6) & 0x3F) as u8;
                *d = 0x80 | (v & 0x3F) as u8;
            }
            _ => unreachable!("utf8_len is always 1..=4"),
        }
        Ok(len)
    }
}

const fn is_scalar(value: u32) -> bool {
    value < SURROGATE_FIRST || (value > SURROGATE_LAST && value <= MAX_SCALAR)
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl From<char> for Scalar {
    fn from(ch: char) -> Self {
        Scalar(ch as u32)
    }
}

impl From<Scalar> for char {
    fn from(s: Scalar) -> Self {
        // Every scalar value is a valid `char`.
        char::from_u32(s.0).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl From<Scalar> for u32 {
    fn from(s: Scalar) -> Self {
        s.0
    }
}

impl TryFrom<u32> for Scalar {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Scalar::from_u32(value)
    }
}
