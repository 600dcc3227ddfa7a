//! UTF-8 to UTF-16 transcoding into caller-supplied buffers.

use alloc::{vec, vec::Vec};

use crate::{
    Error,
    ascii::{ascii_prefix_len, widen_ascii},
    classify::{Rejection, decode_multibyte},
    scan::scan,
};

/// Why [`transcode_to_utf16`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeStatus {
    /// All input was consumed.
    Done,
    /// The output buffer filled up before the input was exhausted.
    DestinationTooSmall,
    /// The input ends inside a sequence that more bytes could complete.
    NeedMoreData,
    /// An invalid sequence starts at `consumed`.
    InvalidData,
}

/// Progress report of one [`transcode_to_utf16`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoded {
    /// Input bytes fully converted.
    pub consumed: usize,
    /// UTF-16 code units written to the front of the output buffer.
    pub written: usize,
    /// Why the call stopped.
    pub status: TranscodeStatus,
}

impl Transcoded {
    /// `false` only when invalid input was found.
    ///
    /// Running out of output space or input is not a failure; compare
    /// [`Transcoded::consumed`] with the input length to detect truncation.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !matches!(self.status, TranscodeStatus::InvalidData)
    }
}

/// Transcodes as much of `input` as fits into `output`.
///
/// Output capacity is checked before every write; a scalar that needs two
/// code units is never split across calls. Stops at the first invalid
/// sequence with [`TranscodeStatus::InvalidData`].
///
/// ```rust
/// use runescan::{TranscodeStatus, transcode_to_utf16};
///
/// let mut out = [0u16; 2];
/// let done = transcode_to_utf16("añb".as_bytes(), &mut out);
/// assert!(done.is_ok());
/// assert_eq!(done.status, TranscodeStatus::DestinationTooSmall);
/// assert_eq!((done.consumed, done.written), (3, 2));
/// ```
#[must_use]
pub fn transcode_to_utf16(input: &[u8], output: &mut [u16]) -> Transcoded {
    let mut consumed = 0;
    let mut written = 0;

    let status = loop {
        let in_rest = &input[consumed..];
        let out_rest = &mut output[written..];
        if in_rest.is_empty() {
            break TranscodeStatus::Done;
        }

        // ASCII maps 1:1, so the window only needs to cover what fits.
        let window = in_rest.len().min(out_rest.len());
        let ascii = ascii_prefix_len(&in_rest[..window]);
        widen_ascii(&in_rest[..ascii], out_rest);
        consumed += ascii;
        written += ascii;
        if ascii == in_rest.len() {
            break TranscodeStatus::Done;
        }
        if ascii == window {
            break TranscodeStatus::DestinationTooSmall;
        }

        while let Some(&lead) = input.get(consumed) {
            if lead < 0x80 {
                break;
            }
            match decode_multibyte(&input[consumed..]) {
                Ok((scalar, seq_len)) => match scalar.encode_utf16(&mut output[written..]) {
                    Ok(units) => {
                        consumed += seq_len;
                        written += units;
                    }
                    Err(_) => break,
                },
                Err(Rejection {
                    incomplete: true, ..
                }) => {
                    return Transcoded {
                        consumed,
                        written,
                        status: TranscodeStatus::NeedMoreData,
                    };
                }
                Err(Rejection { .. }) => {
                    return Transcoded {
                        consumed,
                        written,
                        status: TranscodeStatus::InvalidData,
                    };
                }
            }
        }

        // Left the multi-byte loop: either ASCII follows, the input ended, or
        // the output cannot hold the next scalar.
        if consumed < input.len() && input[consumed] >= 0x80 {
            break TranscodeStatus::DestinationTooSmall;
        }
    };

    Transcoded {
        consumed,
        written,
        status,
    }
}

/// Transcodes all of `input` into `output`, returning the code units written.
///
/// # Errors
///
/// - [`Error::InvalidData`] if `input` contains an invalid or truncated
///   sequence; `offset` is where it starts.
/// - [`Error::BufferTooSmall`] if `output` cannot hold the whole result.
pub fn transcode_to_utf16_exact(input: &[u8], output: &mut [u16]) -> Result<usize, Error> {
    let done = transcode_to_utf16(input, output);
    match done.status {
        TranscodeStatus::Done => Ok(done.written),
        TranscodeStatus::InvalidData | TranscodeStatus::NeedMoreData => {
            Err(Error::InvalidData {
                offset: done.consumed,
            })
        }
        TranscodeStatus::DestinationTooSmall => {
            // Only size the full result on the error path.
            let rest = scan(&input[done.consumed..]);
            if let Some(offset) = rest.first_invalid {
                return Err(Error::InvalidData {
                    offset: done.consumed + offset,
                });
            }
            Err(Error::BufferTooSmall {
                needed: done.written + rest.utf16_len(),
                available: output.len(),
            })
        }
    }
}

/// Transcodes `input` into a freshly allocated, exactly sized UTF-16 buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] with the offset of the first invalid byte.
pub fn to_utf16(input: &[u8]) -> Result<Vec<u16>, Error> {
    let sizing = scan(input);
    if let Some(offset) = sizing.first_invalid {
        return Err(Error::InvalidData { offset });
    }
    let mut out = vec![0u16; sizing.utf16_len()];
    let written = transcode_to_utf16_exact(input, &mut out)?;
    debug_assert_eq!(written, out.len());
    Ok(out)
}
