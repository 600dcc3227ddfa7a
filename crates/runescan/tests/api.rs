#![expect(missing_docs)]

mod common;

use std::borrow::Cow;

use common::{CASES, MIXED, mixed_text};
use runescan::{
    Error, SanitizeOptions, Scalar, TranscodeStatus, Utf8Checker, Verdict, is_well_formed,
    peek_first_sequence, produce_chunks, sanitize, scan, to_utf16, transcode_to_utf16,
    transcode_to_utf16_exact, utf16_len, validate,
};

#[test]
fn scan_reports_expected_offsets() {
    for &(bytes, expected) in CASES {
        let result = scan(bytes);
        assert_eq!(result.first_invalid, expected, "scanning {bytes:02X?}");
        assert_eq!(
            result.first_invalid,
            std::str::from_utf8(bytes).err().map(|e| e.valid_up_to())
        );
        assert_eq!(is_well_formed(bytes), expected.is_none());
    }
}

#[test]
fn long_mixed_text_counts() {
    let text = mixed_text(64 * 1024);
    let result = scan(text.as_bytes());
    assert!(result.is_well_formed());
    assert_eq!(result.runes, text.chars().count());
    assert_eq!(result.surrogate_pairs, text.chars().filter(|c| c.len_utf8() == 4).count());
    assert_eq!(utf16_len(text.as_bytes()), Ok(text.encode_utf16().count()));
}

#[test]
fn transcode_whole_and_in_pieces() {
    let expected: Vec<u16> = MIXED.encode_utf16().collect();
    assert_eq!(to_utf16(MIXED.as_bytes()), Ok(expected.clone()));

    // Drain the input through a small output window.
    let mut input = MIXED.as_bytes();
    let mut collected = Vec::new();
    let mut window = [0u16; 7];
    loop {
        let done = transcode_to_utf16(input, &mut window);
        assert!(done.is_ok());
        collected.extend_from_slice(&window[..done.written]);
        input = &input[done.consumed..];
        if done.status == TranscodeStatus::Done {
            break;
        }
        assert_eq!(done.status, TranscodeStatus::DestinationTooSmall);
    }
    assert_eq!(collected, expected);
}

#[test]
fn transcode_exact_errors() {
    let mut out = [0u16; 4];
    assert_eq!(
        transcode_to_utf16_exact(b"ab\xFFcd", &mut out),
        Err(Error::InvalidData { offset: 2 })
    );
    assert_eq!(
        transcode_to_utf16_exact(b"abcdef", &mut out),
        Err(Error::BufferTooSmall {
            needed: 6,
            available: 4
        })
    );
    assert_eq!(transcode_to_utf16_exact(b"abcd", &mut out), Ok(4));
}

#[test]
fn checker_over_byte_chunks() {
    let text = mixed_text(4096);
    for parts in [1, 2, 3, 7, 64, 1000] {
        let chunks = produce_chunks(text.as_bytes(), parts);
        let mut checker = Utf8Checker::new();
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(checker.try_consume(chunk, i + 1 == chunks.len()), "parts {parts}");
        }
    }
}

#[test]
fn checker_detects_error_in_late_chunk() {
    let mut bytes = mixed_text(1024).into_bytes();
    bytes.extend_from_slice(b"\xED\xA0\x80");
    bytes.extend_from_slice(MIXED.as_bytes());
    let chunks = produce_chunks(&bytes, 10);
    let mut checker = Utf8Checker::new();
    let results: Vec<bool> = chunks
        .iter()
        .enumerate()
        .map(|(i, c)| checker.try_consume(c, i + 1 == chunks.len()))
        .collect();
    let first_false = results.iter().position(|ok| !ok).expect("must fail");
    assert!(results[first_false..].iter().all(|ok| !ok));
    assert!(checker.is_tainted());
}

#[test]
fn sanitize_then_validate() {
    let dirty = b"caf\xC3 cr\xE8me \xF0\x9F\x98";
    let clean = sanitize(dirty, &SanitizeOptions::default());
    assert_eq!(
        validate(&clean),
        Ok("caf\u{FFFD} cr\u{FFFD}me \u{FFFD}")
    );
    let borrowed = SanitizeOptions {
        borrow_if_well_formed: true,
        ..Default::default()
    };
    assert!(matches!(sanitize(&clean, &borrowed), Cow::Borrowed(_)));
}

#[test]
fn peek_walks_a_buffer() {
    let mut bytes: &[u8] = b"A\xC3\xA9\xFF\xE2\x82\xAC\xF0\x9F";
    let mut seen = Vec::new();
    loop {
        let first = peek_first_sequence(bytes);
        if first.verdict == Verdict::Empty {
            break;
        }
        seen.push((first.verdict, first.consumed));
        bytes = &bytes[first.consumed..];
    }
    assert_eq!(
        seen,
        [
            (Verdict::WellFormed(Scalar::from('A')), 1),
            (Verdict::WellFormed(Scalar::from('é')), 2),
            (Verdict::Invalid, 1),
            (Verdict::WellFormed(Scalar::from('€')), 3),
            (Verdict::Incomplete, 2),
        ]
    );
}
