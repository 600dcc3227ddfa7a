use thiserror::Error;

/// Errors surfaced by the APIs that insist on a complete result.
///
/// The bulk scanning loops never produce these directly; they report offsets
/// and status values, and only the convenience entry points convert a failed
/// status into an `Error`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The value is a surrogate code point or lies above `U+10FFFF`.
    #[error("{0:#06X} is not a Unicode scalar value")]
    OutOfRange(u32),
    /// The input failed UTF-8 validation.
    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidData {
        /// Offset of the first byte of the rejected (or truncated) sequence.
        offset: usize,
    },
    /// The output buffer cannot hold the encoded result.
    #[error("output buffer too small: {needed} code units needed, {available} available")]
    BufferTooSmall {
        /// Code units required to complete the write.
        needed: usize,
        /// Code units the caller provided.
        available: usize,
    },
}
