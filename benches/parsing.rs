//! Benchmarks for listpack parsing and pipeline operations.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- timestamps`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use listpack::config::{ListMapping, RunConfig};
use listpack::core::{IdAssigner, Pipeline, TimestampNormalizer};
use listpack::input::RecordReader;
use listpack::parsing::parse_flexible;
use listpack::policy::SourcePolicy;
use listpack::record::RawRecord;

// =============================================================================
// Test Data Generators
// =============================================================================

const DATE_STYLES: &[&str] = &[
    "Wed, 8 Aug 90 12:36:34 CDT",
    "Mon Jan  8 16:08:22 1990",
    "Thu, 07 Apr 2005 22:13:13 -0700",
    "1995-11-14 09:01:02+0100",
    "14 Nov 1995 09:01:02 (GMT)",
    "Fri, 3 Mar 1995 11:22:33 MEZ",
    "sometime last week",
];

fn generate_raw_records(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            RawRecord::new(format!(
                "http://lkml.iu.edu/hypermail/linux/kernel/9{}/{:04}.html",
                i % 10,
                i % 10_000
            ))
            .with_sender_name("Alice")
            .with_time_received(format!(
                "Wed, {} Aug 9{} {:02}:{:02}:{:02} CDT",
                (i % 28) + 1,
                i % 10,
                i % 24,
                (i / 60) % 60,
                i % 60
            ))
            .with_time_sent(DATE_STYLES[i % DATE_STYLES.len()])
            .with_replyto(if i % 3 == 0 { "0001.html" } else { "" })
            .with_subject(format!("Re: message number {}", i))
            .with_body(format!("Body of message {}\n\n-- \nsig", i))
        })
        .collect()
}

fn generate_jsonl(count: usize) -> String {
    generate_raw_records(count)
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_timestamps(c: &mut Criterion) {
    let mut group = c.benchmark_group("timestamps");

    for style in DATE_STYLES {
        group.bench_with_input(BenchmarkId::new("parse_flexible", style), style, |b, s| {
            b.iter(|| parse_flexible(black_box(s)));
        });
    }

    let normalizer = TimestampNormalizer::new(&SourcePolicy::hypermail());
    group.throughput(Throughput::Elements(DATE_STYLES.len() as u64));
    group.bench_function("normalize_all_styles", |b| {
        b.iter(|| {
            for style in DATE_STYLES {
                black_box(normalizer.normalize(style));
            }
        });
    });

    group.finish();
}

fn bench_identifiers(c: &mut Criterion) {
    let stamps: Vec<String> = (0..10_000)
        .map(|i| format!("1990-08-{:02} {:02}:{:02}:{:02}-0500", (i % 28) + 1, i % 24, i % 60, i % 60))
        .collect();

    let mut group = c.benchmark_group("identifiers");
    group.throughput(Throughput::Elements(stamps.len() as u64));
    group.bench_function("assign_10k", |b| {
        b.iter(|| {
            let mut ids = IdAssigner::new();
            for ts in &stamps {
                black_box(ids.assign(ts, "u").unwrap());
            }
        });
    });
    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");
    for size in [1_000, 10_000] {
        let data = generate_jsonl(size);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| RecordReader::new(data.as_bytes()).count());
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    for size in [1_000, 10_000] {
        let records = generate_raw_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let config = RunConfig::new("hypermail", "hypermail")
                    .with_scraping_lists(["lkml"])
                    .with_mailing_list(ListMapping::new("lkml", "linux/kernel"))
                    .with_output_dir(dir.path());
                let mut pipeline = Pipeline::open(config).unwrap();
                for raw in records.iter().cloned() {
                    black_box(pipeline.process(raw).unwrap());
                }
                pipeline.close().unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_timestamps,
    bench_identifiers,
    bench_reader,
    bench_pipeline
);
criterion_main!(benches);
