//! Benchmarks for fingerprinting and near-duplicate detection.
//!
//! Benchmark targets:
//! - Fingerprint of a 2 KB body: <100us
//! - Detection over 50 candidates x 1000 corpus docs: <10ms
//! - Token-set ratio of two short titles: <5us

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use docreg::fingerprint::normalize_body;
use docreg::matching::token_set_ratio;
use docreg::models::{MetaValue, Metadata};
use docreg::{
    DetectionConfig, NearDuplicateDetector, Record, SimHasher, SimilarityHasher, TokenSetMatcher,
};

const WORDS: &[&str] = &[
    "spec", "kit", "plan", "task", "runner", "agent", "workflow", "guide", "hook", "registry",
    "corpus", "render", "pipeline", "storage", "index", "review", "commit", "branch",
];

fn body(seed: usize, words: usize) -> String {
    (0..words)
        .map(|i| WORDS[(seed * 7 + i * 13 + i / 5) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn record(path: String, title: String, text: &str) -> Record {
    Record {
        path,
        metadata: Metadata::new().with("title", MetaValue::String(title)),
        content_hash: String::new(),
        similarity_fingerprint: SimHasher::new().fingerprint_body(text),
    }
}

fn corpus(candidates: usize, established: usize) -> Vec<Record> {
    let mut records: Vec<Record> = (0..established)
        .map(|i| {
            record(
                format!("docs/guides/doc-{i}.md"),
                format!("{} {} guide", WORDS[i % WORDS.len()], i),
                &body(i, 300),
            )
        })
        .collect();
    records.extend((0..candidates).map(|i| {
        record(
            format!("docs/_inbox/new-{i}.md"),
            format!("{} {} notes", WORDS[(i * 3) % WORDS.len()], i),
            &body(i * 31 + 5, 300),
        )
    }));
    records
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    let hasher = SimHasher::new();

    for words in [50usize, 300, 2000] {
        let text = body(1, words);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("simhash", words), &text, |b, text| {
            b.iter(|| hasher.fingerprint_body(black_box(text)));
        });
    }

    let markdown = format!(
        "# Title\n\nSee `cargo run` and https://example.com/x.\n\n```rust\nfn main() {{}}\n```\n{}",
        body(2, 300)
    );
    group.bench_function("normalize", |b| {
        b.iter(|| normalize_body(black_box(&markdown)));
    });

    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("near_duplicates");
    group.measurement_time(Duration::from_secs(5));

    for (candidates, established) in [(10usize, 100usize), (50, 1000)] {
        let records = corpus(candidates, established);
        let detector = NearDuplicateDetector::new(
            Arc::new(SimHasher::new()),
            Arc::new(TokenSetMatcher::new()),
            DetectionConfig::default(),
            "_inbox",
        );
        group.throughput(Throughput::Elements((candidates * established) as u64));
        group.bench_with_input(
            BenchmarkId::new("detect", format!("{candidates}x{established}")),
            &records,
            |b, records| {
                b.iter(|| detector.detect(black_box(records)));
            },
        );
    }

    group.finish();
}

fn bench_title_matching(c: &mut Criterion) {
    c.bench_function("token_set_ratio", |b| {
        b.iter(|| {
            token_set_ratio(
                black_box("Spec Kit Quick Start"),
                black_box("Spec Kit Quickstart Guide"),
            )
        });
    });
}

criterion_group!(benches, bench_fingerprint, bench_detection, bench_title_matching);
criterion_main!(benches);
