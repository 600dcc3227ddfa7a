#![allow(missing_docs, dead_code)]

/// Mixed-script text long enough to exercise the vector and word fast paths.
pub const MIXED: &str = "The quick brown fox jumps over the lazy dog. \
    Příliš žluťoučký kůň úpěl ďábelské ódy. \
    Съешь же ещё этих мягких французских булок. \
    いろはにほへと ちりぬるを 🦊🐕 \u{10FFFF} end";

/// Well-formed and malformed samples with the offset `scan` must report.
pub const CASES: &[(&[u8], Option<usize>)] = &[
    (b"", None),
    (b"plain ascii", None),
    (b"\x58\xC3\xA9\xE2\x82\xAC", None),
    (b"\xF0\x9F\x98\x8A", None),
    (b"\xEF\xBB\xBFbom", None),
    (b"\x80", Some(0)),
    (b"abc\xC0\xAF", Some(3)),
    (b"abc\xE0\x80\x80", Some(3)),
    (b"abc\xED\xA0\x80", Some(3)),
    (b"abc\xF4\x90\x80\x80", Some(3)),
    (b"abcdefghijklmnopqrstuvwxyz0123456789\xF8", Some(36)),
    (b"\xC3\xA9\xC3", Some(2)),
    (b"\xE2\x82", Some(0)),
];

/// Repeats `MIXED` until it is at least `len` bytes long.
pub fn mixed_text(len: usize) -> String {
    let mut s = String::with_capacity(len + MIXED.len());
    while s.len() < len {
        s.push_str(MIXED);
    }
    s
}
