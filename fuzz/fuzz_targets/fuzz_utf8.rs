#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use runescan::{
    SanitizeOptions, Scalar, TranscodeStatus, Utf8Checker, is_well_formed, sanitize, scan,
    split_at_points, transcode_to_utf16,
};

const HEADER: usize = 9; // 1 flag + 8-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Byte sequences that sit on or just past the edges of the well-formed ranges.
static EDGE_TABLE: &[&[u8]] = &[
    b"\x7F",
    b"\x80",
    b"\xC1\xBF",
    b"\xC2\x80",
    b"\xDF\xBF",
    b"\xE0\x9F\xBF",
    b"\xE0\xA0\x80",
    b"\xED\x9F\xBF",
    b"\xED\xA0\x80",
    b"\xEF\xBF\xBF",
    b"\xF0\x8F\xBF\xBF",
    b"\xF0\x90\x80\x80",
    b"\xF4\x8F\xBF\xBF",
    b"\xF4\x90\x80\x80",
    b"\xF5",
    b"\xFF",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u64().to_le_bytes()));

        let mut len = HEADER;
        while len < size.max(HEADER + 1) && len < max_size {
            len += append_piece(&mut data[len..max_size]);
        }
        len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends an edge sequence, a random scalar or an ASCII run, possibly
/// truncated, never exceeding `buf`. Returns the number of bytes written.
fn append_piece(buf: &mut [u8]) -> usize {
    with_rng(|rng| {
        let mut scratch = [0u8; 4];
        let piece: &[u8] = match rng.random_range(0..4) {
            0 => EDGE_TABLE[rng.random_range(0..EDGE_TABLE.len())],
            1 => {
                let c = rng.random::<char>();
                let full = c.encode_utf8(&mut scratch).len();
                &scratch[..rng.random_range(1..=full)]
            }
            _ => b"plain ascii text ",
        };
        let len = piece.len().min(buf.len());
        buf[..len].copy_from_slice(&piece[..len]);
        len
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn check(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from_le_bytes(data[1..HEADER].try_into().unwrap());
    let bytes = &data[HEADER..];

    // Batch validation against core.
    let result = scan(bytes);
    let expected = std::str::from_utf8(bytes);
    assert_eq!(result.first_invalid, expected.err().map(|e| e.valid_up_to()));
    assert_eq!(is_well_formed(bytes), expected.is_ok());
    let prefix = &bytes[..result.first_invalid.unwrap_or(bytes.len())];
    let prefix = std::str::from_utf8(prefix).unwrap();
    assert_eq!(result.runes, prefix.chars().count());
    assert_eq!(result.utf16_len(), prefix.encode_utf16().count());

    // Streaming over random splits agrees with the batch answer.
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let splits: Vec<usize> = (0..rng.random_range(0..16)).map(|_| rng.random()).collect();
    let chunks = split_at_points(bytes, &splits);
    let mut checker = Utf8Checker::new();
    let mut streamed = true;
    for (i, chunk) in chunks.iter().enumerate() {
        streamed = checker.try_consume(chunk, i + 1 == chunks.len());
        if !streamed {
            break;
        }
    }
    if chunks.is_empty() {
        streamed = checker.try_consume(&[], true);
    }
    assert_eq!(streamed, expected.is_ok());

    // Sanitized output is well-formed and a fixed point.
    let replacement = Unstructured::new(&data[1..HEADER])
        .arbitrary::<char>()
        .map_or(Scalar::REPLACEMENT, Scalar::from);
    let options = SanitizeOptions {
        replacement,
        borrow_if_well_formed: flags & 1 != 0,
    };
    let clean = sanitize(bytes, &options);
    assert!(is_well_formed(&clean));
    assert_eq!(sanitize(&clean, &options), clean);

    // Transcoding through a small window reproduces the valid prefix.
    // Two units always fit the next scalar, so every round makes progress.
    let mut window = vec![0u16; usize::from(flags >> 1).max(2)];
    let mut input = bytes;
    let mut units = Vec::new();
    loop {
        let done = transcode_to_utf16(input, &mut window);
        units.extend_from_slice(&window[..done.written]);
        input = &input[done.consumed..];
        match done.status {
            TranscodeStatus::DestinationTooSmall => continue,
            TranscodeStatus::Done => assert!(expected.is_ok()),
            TranscodeStatus::NeedMoreData | TranscodeStatus::InvalidData => {
                assert!(expected.is_err());
            }
        }
        break;
    }
    assert_eq!(units, prefix.encode_utf16().collect::<Vec<_>>());
}

fuzz_target!(|data: &[u8]| check(data));
