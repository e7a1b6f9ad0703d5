//! Benchmark suite for AVSC parse throughput
//!
//! Measures how fast generated schema documents are parsed:
//! - Wide records with many primitive fields
//! - Many named types referenced before they are defined
//! - Deeply nested records, each in its own namespace
//!
//! # Configuration
//!
//! Benchmark behavior can be configured via environment variables:
//!
//! - `BENCH_SAMPLE_SIZE`: Number of samples to collect (default: 100)
//! - `BENCH_MEASUREMENT_TIME`: Measurement time in seconds (default: 5)
//! - `BENCH_WARM_UP_TIME`: Warm-up time in seconds (default: 3)
//!
//! # Examples
//!
//! ```bash
//! BENCH_SAMPLE_SIZE=50 BENCH_MEASUREMENT_TIME=3 cargo bench
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use avsc_parser::schema::{AvscParser, ParserConfig};

/// Configure Criterion based on environment variables
fn configure_criterion() -> Criterion {
    let mut criterion = Criterion::default();

    if let Ok(sample_size) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(size) = sample_size.parse::<usize>() {
            criterion = criterion.sample_size(size);
            eprintln!("Configured sample size: {}", size);
        } else {
            eprintln!("Warning: Invalid BENCH_SAMPLE_SIZE value: {}", sample_size);
        }
    }

    if let Ok(measurement_time) = std::env::var("BENCH_MEASUREMENT_TIME") {
        if let Ok(secs) = measurement_time.parse::<u64>() {
            criterion = criterion.measurement_time(Duration::from_secs(secs));
            eprintln!("Configured measurement time: {}s", secs);
        } else {
            eprintln!(
                "Warning: Invalid BENCH_MEASUREMENT_TIME value: {}",
                measurement_time
            );
        }
    }

    if let Ok(warm_up_time) = std::env::var("BENCH_WARM_UP_TIME") {
        if let Ok(secs) = warm_up_time.parse::<u64>() {
            criterion = criterion.warm_up_time(Duration::from_secs(secs));
            eprintln!("Configured warm-up time: {}s", secs);
        } else {
            eprintln!(
                "Warning: Invalid BENCH_WARM_UP_TIME value: {}",
                warm_up_time
            );
        }
    }

    criterion
}

/// A record with `n` primitive fields.
fn wide_record(n: usize) -> String {
    let primitives = ["int", "long", "string", "bytes", "double", "boolean"];
    let fields: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"name": "f{}", "type": "{}"}}"#,
                i,
                primitives[i % primitives.len()]
            )
        })
        .collect();
    format!(
        r#"{{"type": "record", "name": "Wide", "namespace": "bench", "fields": [{}]}}"#,
        fields.join(",")
    )
}

/// A record referencing `n` enums before defining them.
fn forward_references(n: usize) -> String {
    let refs = (0..n).map(|i| format!(r#"{{"name": "r{}", "type": ["null", "E{}"]}}"#, i, i));
    let defs = (0..n).map(|i| {
        format!(
            r#"{{"name": "d{}", "type": {{"type": "enum", "name": "E{}", "symbols": ["A", "B", "C"]}}}}"#,
            i, i
        )
    });
    let fields: Vec<String> = refs.chain(defs).collect();
    format!(
        r#"{{"type": "record", "name": "Refs", "namespace": "bench", "fields": [{}]}}"#,
        fields.join(",")
    )
}

/// Records nested `depth` levels deep, alternating namespaces.
fn nested_namespaces(depth: usize) -> String {
    let mut schema = r#""long""#.to_string();
    for level in (0..depth).rev() {
        schema = format!(
            r#"{{"type": "record", "name": "L{}", "namespace": "ns{}", "fields": [{{"name": "child", "type": {}}}]}}"#,
            level,
            level % 2,
            schema
        );
    }
    schema
}

fn bench_document(c: &mut Criterion, group_name: &str, docs: Vec<(usize, String)>) {
    let parser = AvscParser::default();
    let mut group = c.benchmark_group(group_name);

    for (size, doc) in &docs {
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", size), doc, |b, doc| {
            b.iter(|| parser.parse_str(black_box(doc)).unwrap());
        });
    }

    group.finish();
}

fn bench_wide_records(c: &mut Criterion) {
    let docs = [10, 100, 1_000]
        .into_iter()
        .map(|n| (n, wide_record(n)))
        .collect();
    bench_document(c, "wide_record", docs);
}

fn bench_forward_references(c: &mut Criterion) {
    let docs = [10, 100, 1_000]
        .into_iter()
        .map(|n| (n, forward_references(n)))
        .collect();
    bench_document(c, "forward_references", docs);
}

fn bench_nested_namespaces(c: &mut Criterion) {
    let parser = AvscParser::new(ParserConfig::new().with_max_depth(256));
    let mut group = c.benchmark_group("nested_namespaces");

    for depth in [8, 32, 100] {
        let doc = nested_namespaces(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::new("parse", depth), &doc, |b, doc| {
            b.iter(|| parser.parse_str(black_box(doc)).unwrap());
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_wide_records, bench_forward_references, bench_nested_namespaces
}
criterion_main!(benches);
