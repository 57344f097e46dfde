use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    AtomicFlakeGenerator, Flake, FlakeGenerator, FlakeLayout, Identity, LockFlakeGenerator,
    MicrosLayout, MonotonicClock, NarrowSidLayout, TimeSource, WideSidLayout,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    ticks: u64,
}

impl TimeSource for FixedMockTime {
    fn current_ticks(&self) -> u64 {
        self.ticks
    }
}

// Number of flakes generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_FLAKES: usize = 4096;

/// Benchmarks a single generator driven from one thread.
fn bench_generator<L, G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    L: FlakeLayout,
    G: FlakeGenerator<L, T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_FLAKES as u64));

    group.bench_function(format!("elems/{}", TOTAL_FLAKES), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_FLAKES {
                    black_box(generator.next_flake());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared generator across threads.
fn bench_generator_contended<L, G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    L: FlakeLayout,
    G: FlakeGenerator<L, T> + Send + Sync,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    let max_threads = num_cpus::get().clamp(1, 16);

    for thread_count in [1, 2, 4, 8, 16].into_iter().filter(|&n| n <= max_threads) {
        let flakes_per_thread = TOTAL_FLAKES / thread_count;

        group.throughput(Throughput::Elements(TOTAL_FLAKES as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_FLAKES, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..flakes_per_thread {
                                        black_box(generator.next_flake());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn mock_generator<L, G>() -> G
where
    L: FlakeLayout,
    G: FlakeGenerator<L, FixedMockTime>,
{
    G::from_components(Identity::new(b"bench01"), 1211, 0, FixedMockTime { ticks: 1 })
}

// --- MOCK CLOCK (fixed, non-advancing time) ---

/// Single-threaded benchmark for `LockFlakeGenerator` with a fixed clock.
fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator::<WideSidLayout, _, _>(c, "mock/sequential/lock", || {
        mock_generator::<WideSidLayout, LockFlakeGenerator<WideSidLayout, FixedMockTime>>()
    });
}

/// Single-threaded benchmark for `AtomicFlakeGenerator` with a fixed clock.
fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_generator::<WideSidLayout, _, _>(c, "mock/sequential/atomic", || {
        mock_generator::<WideSidLayout, AtomicFlakeGenerator<WideSidLayout, FixedMockTime>>()
    });
}

/// Multithreaded benchmark for `LockFlakeGenerator` with a fixed clock.
fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_generator_contended::<WideSidLayout, _, _>(c, "mock/contended/lock", || {
        mock_generator::<WideSidLayout, LockFlakeGenerator<WideSidLayout, FixedMockTime>>()
    });
}

/// Multithreaded benchmark for `AtomicFlakeGenerator` with a fixed clock.
fn benchmark_mock_contended_atomic(c: &mut Criterion) {
    bench_generator_contended::<WideSidLayout, _, _>(c, "mock/contended/atomic", || {
        mock_generator::<WideSidLayout, AtomicFlakeGenerator<WideSidLayout, FixedMockTime>>()
    });
}

// --- MONOTONIC CLOCK ---

/// Single-threaded benchmark for each layout with `MonotonicClock`.
fn benchmark_mono_sequential_layouts(c: &mut Criterion) {
    bench_generator::<WideSidLayout, _, _>(c, "mono/sequential/wide_sid", || {
        AtomicFlakeGenerator::<WideSidLayout>::new(b"bench01", 1211).unwrap()
    });
    bench_generator::<NarrowSidLayout, _, _>(c, "mono/sequential/narrow_sid", || {
        AtomicFlakeGenerator::<NarrowSidLayout>::new(b"bench001", 1211).unwrap()
    });
    bench_generator::<MicrosLayout, _, _>(c, "mono/sequential/micros", || {
        AtomicFlakeGenerator::<MicrosLayout>::new(b"bench001", 0).unwrap()
    });
}

/// Multithreaded benchmark for `LockFlakeGenerator` with `MonotonicClock`.
fn benchmark_mono_threaded_lock(c: &mut Criterion) {
    let clock = MonotonicClock::for_layout::<WideSidLayout>();
    bench_generator_contended::<WideSidLayout, _, _>(c, "mono/contended/lock", || {
        LockFlakeGenerator::<WideSidLayout, _>::from_components(
            Identity::new(b"bench01"),
            1211,
            0,
            clock.clone(),
        )
    });
}

/// Multithreaded benchmark for `AtomicFlakeGenerator` with `MonotonicClock`.
fn benchmark_mono_threaded_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::for_layout::<WideSidLayout>();
    bench_generator_contended::<WideSidLayout, _, _>(c, "mono/contended/atomic", || {
        AtomicFlakeGenerator::<WideSidLayout, _>::from_components(
            Identity::new(b"bench01"),
            1211,
            0,
            clock.clone(),
        )
    });
}

// --- CODEC ---

/// Packing and unpacking a flake without a generator.
fn benchmark_pack_unpack(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let identity = Identity::<WideSidLayout>::new(b"hello12");

    group.bench_function("pack", |b| {
        b.iter(|| {
            Flake::<WideSidLayout>::pack(
                black_box(1_000),
                black_box(7),
                black_box(1211),
                identity,
            )
        });
    });

    let flake = Flake::<WideSidLayout>::pack(1_000, 7, 1211, identity);
    group.bench_function("unpack", |b| {
        b.iter(|| {
            let flake = black_box(flake);
            (flake.timestamp(), flake.sequence(), flake.secondary_id(), flake.id())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_lock,
    benchmark_mock_sequential_atomic,
    benchmark_mock_contended_lock,
    benchmark_mock_contended_atomic,
    // Monotonic clock
    benchmark_mono_sequential_layouts,
    benchmark_mono_threaded_lock,
    benchmark_mono_threaded_atomic,
    // Codec
    benchmark_pack_unpack,
);
criterion_main!(benches);
