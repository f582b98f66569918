//! Criterion benchmarks for the sampling and reporting hot paths.
//!
//! Measures single-worker batch throughput across batch sizes and the cost
//! of rendering the exact estimate, which grows with the size of the totals.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pi_engine::ratio::{format_decimal, pi_ratio, REPORT_DIGITS};
use pi_engine::rng::SampleRng;
use pi_engine::worker::SampleWorker;

/// Benchmark one worker sampling a full batch.
fn bench_sample_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_batch");

    for size in [1_000u64, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut worker = SampleWorker::new(0, size, SampleRng::from_seed(42));
            b.iter(|| black_box(worker.sample_batch()));
        });
    }

    group.finish();
}

/// Benchmark computing and rendering the estimate at growing totals.
fn bench_exact_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_estimate");

    for total in [1_000_000u64, 1_000_000_000, 1_000_000_000_000] {
        let inside = total / 4 * 3 + 12_345;
        group.bench_with_input(BenchmarkId::from_parameter(total), &total, |b, &total| {
            b.iter(|| {
                let pi = pi_ratio(black_box(inside), black_box(total));
                format_decimal(&pi, REPORT_DIGITS)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample_batch, bench_exact_estimate);
criterion_main!(benches);
