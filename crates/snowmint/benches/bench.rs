use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowmint::{IdGenerator, Layout, ThreadSleep, TimeSource, WallClock};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: i64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path: a fixed clock and a fresh generator per
/// iteration, so the sequence never exhausts.
fn bench_fixed_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = IdGenerator::with_parts(
                    Layout::default(),
                    0,
                    FixedMockTime { millis: 1 },
                    ThreadSleep,
                )
                .unwrap();
                // Sequence 0..=4095 at timestamp 1; the seed is (0, 0)
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the wall clock, including spins on sequence exhaustion.
fn bench_wall_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("wall_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = IdGenerator::new(1).unwrap();
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmarks a shared generator across threads.
fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(
                        IdGenerator::with_parts(
                            Layout::default(),
                            0,
                            WallClock::default(),
                            ThreadSleep,
                        )
                        .unwrap(),
                    );
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fixed_clock, bench_wall_clock, bench_contended);
criterion_main!(benches);
