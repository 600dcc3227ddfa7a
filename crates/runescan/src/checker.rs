//! Incremental validity checking for input that arrives in chunks.
//!
//! Chunks may split a multi-byte sequence anywhere. The checker carries the
//! unterminated prefix (at most 3 bytes) from one call to the next, and once
//! it has seen invalid data it stays failed.

use core::fmt;

use bstr::BStr;

use crate::{
    classify::{Verdict, expected_len, peek_first_sequence},
    scan::scan,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Clean,
    /// `bytes[..len]` is a valid, unterminated prefix of a sequence of
    /// `expected` bytes; `1 <= len < expected`.
    Buffering {
        bytes: [u8; 4],
        len: u8,
        expected: u8,
    },
    Tainted,
}

impl State {
    /// Buffers the truncated tail the scanner stopped at.
    #[allow(clippy::cast_possible_truncation)]
    fn buffering(tail: &[u8]) -> Self {
        debug_assert!((1..=3).contains(&tail.len()));
        let mut bytes = [0u8; 4];
        bytes[..tail.len()].copy_from_slice(tail);
        State::Buffering {
            bytes,
            len: tail.len() as u8,
            expected: expected_len(tail[0]).unwrap_or(4) as u8,
        }
    }
}

/// Validates a UTF-8 stream fed in arbitrary chunks.
///
/// Feeding the chunks of a buffer in order, with `is_final` set only on the
/// last one, yields `true` from every call exactly when the whole buffer is
/// well-formed. After the first `false`, every later call also returns
/// `false`; drop the checker and create a new one to start over.
///
/// ```rust
/// use runescan::Utf8Checker;
///
/// let text = "naïve €".as_bytes();
/// let mut checker = Utf8Checker::new();
/// for chunk in text.chunks(1) {
///     assert!(checker.try_consume(chunk, false));
/// }
/// assert!(checker.try_consume(&[], true));
///
/// let mut checker = Utf8Checker::new();
/// assert!(checker.try_consume(&[0xE2, 0x82], false));
/// assert!(!checker.try_consume(&[0x41], false));
/// assert!(checker.is_tainted());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Utf8Checker {
    state: State,
}

impl Default for Utf8Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8Checker {
    /// A checker that has seen no input.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Clean,
        }
    }

    /// Consumes the next chunk and reports whether the stream is valid so far.
    ///
    /// With `is_final == true`, a sequence left unterminated at the end of
    /// `chunk` makes the call fail, since no more bytes can complete it.
    /// Calling again after a final chunk is not supported: the result of such
    /// a call is unspecified.
    #[allow(clippy::cast_possible_truncation)]
    pub fn try_consume(&mut self, chunk: &[u8], is_final: bool) -> bool {
        let mut chunk = chunk;

        match self.state {
            State::Tainted => return false,
            State::Clean => {}
            State::Buffering {
                mut bytes,
                len,
                expected,
            } => {
                let held = usize::from(len);
                let take = chunk.len().min(4 - held);
                bytes[held..held + take].copy_from_slice(&chunk[..take]);
                let first = peek_first_sequence(&bytes[..held + take]);
                match first.verdict {
                    Verdict::WellFormed(scalar) => {
                        trace!("completed buffered {scalar:?} across chunk boundary");
                        self.state = State::Clean;
                        chunk = &chunk[first.consumed - held..];
                    }
                    Verdict::Incomplete => {
                        self.state = State::Buffering {
                            bytes,
                            len: (held + take) as u8,
                            expected,
                        };
                        return !is_final;
                    }
                    Verdict::Invalid | Verdict::Empty => {
                        trace!("invalid sequence completing buffered prefix");
                        self.state = State::Tainted;
                        return false;
                    }
                }
            }
        }

        if chunk.is_empty() {
            return true;
        }
        let Some(offset) = scan(chunk).first_invalid else {
            return true;
        };
        let tail = &chunk[offset..];
        match peek_first_sequence(tail).verdict {
            Verdict::Incomplete => {
                trace!("buffering {} byte(s) of an unterminated sequence", tail.len());
                self.state = State::buffering(tail);
                !is_final
            }
            _ => {
                trace!("invalid UTF-8 in chunk at offset {offset}");
                self.state = State::Tainted;
                false
            }
        }
    }

    /// `true` once invalid data has been observed.
    #[must_use]
    pub const fn is_tainted(&self) -> bool {
        matches!(self.state, State::Tainted)
    }

    /// Bytes of an unterminated sequence carried over to the next call.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        match &self.state {
            State::Buffering { bytes, len, .. } => &bytes[..usize::from(*len)],
            State::Clean | State::Tainted => &[],
        }
    }

    /// Total length of the sequence whose prefix is pending, if any.
    #[must_use]
    pub const fn pending_sequence_len(&self) -> Option<usize> {
        match self.state {
            State::Buffering { expected, .. } => Some(expected as usize),
            State::Clean | State::Tainted => None,
        }
    }
}

impl fmt::Debug for Utf8Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            State::Clean => f.write_str("Utf8Checker::Clean"),
            State::Tainted => f.write_str("Utf8Checker::Tainted"),
            State::Buffering { expected, .. } => f
                .debug_struct("Utf8Checker::Buffering")
                .field("pending", &BStr::new(self.pending()))
                .field("expected", &expected)
                .finish(),
        }
    }
}
