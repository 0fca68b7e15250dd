//! Stream pipeline benchmarks.
//!
//! Measures sequential stage overhead against a plain iterator, and the
//! order-preserving concurrent map at several concurrency levels.
//!
//! All async benchmarks use `to_async(&runtime)` so that `block_on` is
//! batched per sample.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fpkit::stream::{Stream, StreamConfig};
use std::hint::black_box;
use std::time::Duration;

const SIZES: [u64; 3] = [100, 1_000, 10_000];

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime")
}

// =============================================================================
// Sequential Pipeline Benchmarks
// =============================================================================

fn benchmark_sequential_pipeline(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("stream_sequential_pipeline");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("iterator", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let result: u64 = (0..size).map(|value| value * 2).filter(|value| value % 3 == 0).sum();
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("stream", size), &size, |bencher, &size| {
            bencher.to_async(&runtime).iter(|| async move {
                let result = Stream::lazy(0..size)
                    .map(|value| value * 2)
                    .filter(|value| value % 3 == 0)
                    .sum()
                    .await;
                black_box(result)
            });
        });
    }

    group.finish();
}

fn benchmark_buffer_size(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("stream_buffer_size");

    for buffer_size in [1, 16, 64, 256] {
        let config = StreamConfig::new(buffer_size, 1);
        group.bench_with_input(BenchmarkId::new("map_to_vec", buffer_size), &config, |bencher, &config| {
            bencher.to_async(&runtime).iter(|| async move {
                let result = Stream::lazy(0..1_000_u64)
                    .configure(config)
                    .map(|value| value + 1)
                    .to_vec()
                    .await;
                black_box(result)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Concurrent Map Benchmarks
// =============================================================================

fn benchmark_concurrent_map(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("stream_concurrent_map");
    group.sample_size(20);

    for concurrency in [1, 4, 16] {
        group.bench_with_input(
            BenchmarkId::new("then_concurrent_sleep", concurrency),
            &concurrency,
            |bencher, &concurrency| {
                bencher.to_async(&runtime).iter(|| async move {
                    let result = Stream::lazy(0..64_u64)
                        .then_concurrent(concurrency, |value| async move {
                            tokio::time::sleep(Duration::from_micros(200)).await;
                            value
                        })
                        .count()
                        .await;
                    black_box(result)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("map_concurrent_cpu", concurrency),
            &concurrency,
            |bencher, &concurrency| {
                bencher.to_async(&runtime).iter(|| async move {
                    let result = Stream::of(0..256_u64)
                        .map_concurrent(concurrency, |value| (0..500).fold(value, |acc, step| acc ^ (acc << 1) ^ step))
                        .count()
                        .await;
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sequential_pipeline,
    benchmark_buffer_size,
    benchmark_concurrent_map
);
criterion_main!(benches);
