//! Benchmarks for hashing and matching image pairs.
//!
//! Compares cascade matching against exhaustive ratio-test matching at
//! typical per-image descriptor counts.

use cascade_hash::benchmark::{brute_force_matches, create_descriptor_pair};
use cascade_hash::{CascadeHasher, MatchOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const DIM: usize = 128;

fn bench_hash_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_image");
    group.sample_size(20);

    let hasher = CascadeHasher::with_seed(DIM, 7).unwrap();
    for n in [1_000, 5_000].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        let pair = create_descriptor_pair(*n, 0, 0, DIM, 0.0, 42);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |bench, _| {
            bench.iter(|| hasher.hash_image(black_box(&pair.target)).unwrap());
        });
    }

    group.finish();
}

fn bench_match_images(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_images");
    group.sample_size(10);

    let hasher = CascadeHasher::with_seed(DIM, 7).unwrap();
    let options = MatchOptions::default();

    for n in [1_000, 5_000].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        let pair = create_descriptor_pair(*n, n / 2, n / 2, DIM, 0.02, 42);
        let query = hasher.hash_image(&pair.query).unwrap();
        let target = hasher.hash_image(&pair.target).unwrap();

        group.bench_with_input(BenchmarkId::new("cascade", n), n, |bench, _| {
            bench.iter(|| {
                hasher
                    .match_images_with(&query, &pair.query, &target, &pair.target, &options)
                    .unwrap()
            });
        });

        // Exhaustive is quadratic; keep it to the smaller size.
        if *n <= 1_000 {
            group.bench_with_input(BenchmarkId::new("brute_force", n), n, |bench, _| {
                bench.iter(|| {
                    brute_force_matches(black_box(&pair.query), &pair.target, 0.8).unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_hash_image, bench_match_images);
criterion_main!(benches);
