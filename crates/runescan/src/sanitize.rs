//! Replacing invalid runs so that any byte buffer becomes well-formed UTF-8.
//!
//! Sizing and materialization walk the same [`Utf8Chunks`] sequence: a
//! well-formed span found by the bulk scanner, followed by the invalid run the
//! classifier blames at its end.

use alloc::{borrow::Cow, vec::Vec};
use core::{fmt, iter::FusedIterator};

use bstr::BStr;

use crate::{SanitizeOptions, classify::invalid_run_len, scan::scan};

/// A well-formed span and the invalid run that immediately follows it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Utf8Chunk<'a> {
    valid: &'a [u8],
    invalid: &'a [u8],
}

impl<'a> Utf8Chunk<'a> {
    /// The well-formed bytes; possibly empty.
    #[must_use]
    pub fn valid(&self) -> &'a [u8] {
        self.valid
    }

    /// The invalid run, replaced by one scalar when sanitizing. Empty only
    /// for the final chunk of a buffer that ends well-formed.
    #[must_use]
    pub fn invalid(&self) -> &'a [u8] {
        self.invalid
    }
}

impl fmt::Debug for Utf8Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utf8Chunk")
            .field("valid", &BStr::new(self.valid))
            .field("invalid", &BStr::new(self.invalid))
            .finish()
    }
}

/// Iterator over the [`Utf8Chunk`]s of a byte buffer.
///
/// ```rust
/// use runescan::Utf8Chunks;
///
/// let chunks: Vec<_> = Utf8Chunks::new(b"ok\xE0\x80!\xFF")
///     .map(|c| (c.valid(), c.invalid()))
///     .collect();
/// assert_eq!(
///     chunks,
///     [(&b"ok"[..], &b"\xE0\x80"[..]), (&b"!"[..], &b"\xFF"[..])]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Utf8Chunks<'a> {
    rest: &'a [u8],
    /// Offset of the first invalid byte in `rest`, when already known.
    known_invalid: Option<usize>,
}

impl<'a> Utf8Chunks<'a> {
    /// Iterates over the chunks of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            rest: bytes,
            known_invalid: None,
        }
    }

    /// Skips rescanning a prefix that a previous [`scan`] proved well-formed.
    fn starting_at(bytes: &'a [u8], first_invalid: usize) -> Self {
        Self {
            rest: bytes,
            known_invalid: Some(first_invalid),
        }
    }
}

impl<'a> Iterator for Utf8Chunks<'a> {
    type Item = Utf8Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let first_invalid = self
            .known_invalid
            .take()
            .or_else(|| scan(self.rest).first_invalid);
        let Some(offset) = first_invalid else {
            let chunk = Utf8Chunk {
                valid: self.rest,
                invalid: &[],
            };
            self.rest = &[];
            return Some(chunk);
        };

        let (valid, tail) = self.rest.split_at(offset);
        let run = invalid_run_len(tail);
        debug_assert!(run > 0, "scanner and classifier disagree at {offset}");
        let (invalid, rest) = tail.split_at(run);
        self.rest = rest;
        Some(Utf8Chunk { valid, invalid })
    }
}

impl FusedIterator for Utf8Chunks<'_> {}

fn sized(bytes: &[u8], first_invalid: usize, options: &SanitizeOptions) -> usize {
    let replacement = options.replacement.utf8_len();
    let mut valid = 0;
    let mut runs = 0;
    for chunk in Utf8Chunks::starting_at(bytes, first_invalid) {
        valid += chunk.valid.len();
        if !chunk.invalid.is_empty() {
            runs += 1;
        }
    }
    valid + runs * replacement
}

fn materialize(bytes: &[u8], first_invalid: usize, options: &SanitizeOptions, out: &mut Vec<u8>) {
    let needed = sized(bytes, first_invalid, options);
    out.reserve(needed);
    let mut buf = [0u8; 4];
    let replacement = char::from(options.replacement)
        .encode_utf8(&mut buf)
        .as_bytes();
    let start = out.len();
    for chunk in Utf8Chunks::starting_at(bytes, first_invalid) {
        out.extend_from_slice(chunk.valid);
        if !chunk.invalid.is_empty() {
            out.extend_from_slice(replacement);
        }
    }
    debug_assert_eq!(out.len() - start, needed);
    trace!(
        "sanitized {} input bytes into {} (first invalid at {})",
        bytes.len(),
        needed,
        first_invalid
    );
}

/// Length in bytes of [`sanitize`]'s output for `bytes`.
#[must_use]
pub fn sanitized_len(bytes: &[u8], options: &SanitizeOptions) -> usize {
    match scan(bytes).first_invalid {
        None => bytes.len(),
        Some(first_invalid) => sized(bytes, first_invalid, options),
    }
}

/// Appends the sanitized form of `bytes` to `out`.
pub fn sanitize_into(bytes: &[u8], options: &SanitizeOptions, out: &mut Vec<u8>) {
    match scan(bytes).first_invalid {
        None => out.extend_from_slice(bytes),
        Some(first_invalid) => materialize(bytes, first_invalid, options, out),
    }
}

/// Returns `bytes` with every invalid run replaced by
/// [`SanitizeOptions::replacement`].
///
/// The result is always well-formed UTF-8, and sanitizing it again returns it
/// unchanged. Well-formed input is copied, or borrowed when
/// [`SanitizeOptions::borrow_if_well_formed`] is set.
///
/// A sequence truncated by the end of `bytes` becomes a single replacement
/// scalar, however many of its bytes are present.
///
/// ```rust
/// use runescan::{SanitizeOptions, sanitize};
///
/// let clean = sanitize(b"caf\xC3", &SanitizeOptions::default());
/// assert_eq!(&*clean, "caf\u{FFFD}".as_bytes());
///
/// let clean = sanitize(b"ok\xF0\x9F\x98", &SanitizeOptions::default());
/// assert_eq!(&*clean, "ok\u{FFFD}".as_bytes());
/// ```
#[must_use]
pub fn sanitize<'a>(bytes: &'a [u8], options: &SanitizeOptions) -> Cow<'a, [u8]> {
    match scan(bytes).first_invalid {
        None if options.borrow_if_well_formed => Cow::Borrowed(bytes),
        None => Cow::Owned(bytes.to_vec()),
        Some(first_invalid) => {
            let mut out = Vec::new();
            materialize(bytes, first_invalid, options, &mut out);
            Cow::Owned(out)
        }
    }
}
