//! Performance benchmarks for the ranking index
//!
//! These validate the design's logarithmic rank-by-position and
//! position-of-element claims by sweeping index size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use leaderboard_core::Score;
use leaderboard_engine::RankingIndex;

fn populated(size: i64) -> RankingIndex {
    let mut index = RankingIndex::new(32);
    let mut rng = StdRng::seed_from_u64(7);
    for id in 0..size {
        let score = Score::from_raw((id * 37 % 9973) + 1);
        index.insert(id, score, &mut rng).unwrap();
    }
    index
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || populated(size),
                |mut index| {
                    let mut rng = StdRng::seed_from_u64(9);
                    black_box(index.insert(size, Score::from_raw(5_000), &mut rng))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_range_by_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_by_rank");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let index = populated(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mid = size / 2;
            b.iter(|| black_box(index.range_by_rank(mid, mid + 9)));
        });
    }

    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let index = populated(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mid = size / 2;
            b.iter(|| black_box(index.neighbors(mid, 5, 5)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_range_by_rank, bench_neighbors);
criterion_main!(benches);
