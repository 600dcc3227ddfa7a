//! High-throughput UTF-8 validation, UTF-16 transcoding and incremental
//! (chunked) validity checking over caller-owned buffers.
//!
//! Every entry point borrows its input for the duration of one call and never
//! reads past `bytes.len()`, including in the word-at-a-time and vector ASCII
//! fast paths.
//!
//! ```rust
//! use runescan::{Utf8Checker, scan, transcode_to_utf16};
//!
//! let input = "Xé€".as_bytes();
//! let result = scan(input);
//! assert_eq!(result.first_invalid, None);
//! assert_eq!(result.runes, 3);
//!
//! let mut out = [0u16; 3];
//! let done = transcode_to_utf16(input, &mut out);
//! assert!(done.is_ok());
//! assert_eq!(out, [0x0058, 0x00E9, 0x20AC]);
//!
//! let mut checker = Utf8Checker::new();
//! assert!(checker.try_consume(&input[..2], false));
//! assert!(checker.try_consume(&input[2..], true));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::log::trace!(target: "runescan", $($arg)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

mod ascii;
mod checker;
mod chunk_utils;
mod classify;
mod error;
mod options;
mod sanitize;
mod scalar;
mod scan;
mod transcode;

#[cfg(test)]
mod tests;

pub use checker::Utf8Checker;
pub use chunk_utils::{produce_chunks, produce_prefixes, split_at_points};
pub use classify::{FirstSequence, Verdict, expected_len, peek_first_sequence};
pub use error::Error;
pub use options::SanitizeOptions;
pub use sanitize::{Utf8Chunk, Utf8Chunks, sanitize, sanitize_into, sanitized_len};
pub use scalar::Scalar;
pub use scan::{ScanResult, is_well_formed, scan, utf16_len, validate};
pub use transcode::{
    TranscodeStatus, Transcoded, to_utf16, transcode_to_utf16, transcode_to_utf16_exact,
};
