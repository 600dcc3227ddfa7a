//! Benchmark – bulk scanning, transcoding and chunked checking
#![allow(missing_docs)]

use std::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use runescan::{
    SanitizeOptions, Utf8Checker, produce_chunks, produce_prefixes, sanitize, scan,
    transcode_to_utf16,
};

const MIXED: &str = "Příliš žluťoučký kůň úpěl ďábelské ódy. いろはにほへと 🦊 ";

/// Deterministic payload of exactly `len` bytes, cut back to a char boundary.
fn make_payload(len: usize, unit: &str) -> Vec<u8> {
    let mut s = String::with_capacity(len + unit.len());
    while s.len() < len {
        s.push_str(unit);
    }
    let mut end = len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s.into_bytes()
}

fn payloads() -> [(&'static str, Vec<u8>); 2] {
    [
        ("ascii", make_payload(64 * 1024, "the lazy dog ")),
        ("mixed", make_payload(64 * 1024, MIXED)),
    ]
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for (name, payload) in payloads() {
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("runescan", name), &payload, |b, p| {
            b.iter(|| black_box(scan(black_box(p))));
        });
        group.bench_with_input(BenchmarkId::new("core", name), &payload, |b, p| {
            b.iter(|| black_box(std::str::from_utf8(black_box(p)).is_ok()));
        });
    }
    group.finish();
}

fn bench_transcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcode_utf16");
    for (name, payload) in payloads() {
        let mut out = vec![0u16; payload.len()];
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_function(BenchmarkId::new("runescan", name), |b| {
            b.iter(|| black_box(transcode_to_utf16(black_box(&payload), &mut out)));
        });
        group.bench_function(BenchmarkId::new("core", name), |b| {
            b.iter(|| {
                let text = std::str::from_utf8(black_box(&payload)).unwrap_or_default();
                let mut written = 0;
                for (slot, unit) in out.iter_mut().zip(text.encode_utf16()) {
                    *slot = unit;
                    written += 1;
                }
                black_box(written)
            });
        });
    }
    group.finish();
}

fn run_checker(chunks: &[&[u8]]) -> bool {
    let mut checker = Utf8Checker::new();
    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .all(|(i, chunk)| checker.try_consume(chunk, i == last))
}

/// Rescans each growing prefix from scratch, the way a caller without an
/// incremental checker would.
fn run_prefix_rescan(prefixes: &[&[u8]]) -> usize {
    prefixes.iter().map(|prefix| scan(prefix).runes).sum()
}

fn bench_checker(c: &mut Criterion) {
    let payload = make_payload(16 * 1024, MIXED);
    let mut group = c.benchmark_group("checker_split");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    for &parts in &[1usize, 100, 1_000] {
        let chunks = produce_chunks(&payload, parts);
        let prefixes = produce_prefixes(&payload, parts);
        group.bench_with_input(BenchmarkId::new("checker", parts), &parts, |b, &_p| {
            b.iter(|| black_box(run_checker(black_box(&chunks))));
        });
        group.bench_with_input(BenchmarkId::new("prefix_rescan", parts), &parts, |b, &_p| {
            b.iter(|| black_box(run_prefix_rescan(black_box(&prefixes))));
        });
    }
    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let mut payload = make_payload(64 * 1024, MIXED);
    // Poison every 97th byte.
    for byte in payload.iter_mut().step_by(97) {
        *byte = 0xFF;
    }
    let mut group = c.benchmark_group("sanitize");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("runescan", |b| {
        b.iter(|| black_box(sanitize(black_box(&payload), &SanitizeOptions::default())));
    });
    group.bench_function("std_lossy", |b| {
        b.iter(|| black_box(String::from_utf8_lossy(black_box(&payload))));
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "test-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(2))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = bench_scan, bench_transcode, bench_checker, bench_sanitize
}
criterion_main!(benches);
