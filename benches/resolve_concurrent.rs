#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Barrier,
    },
    thread,
    time::{Duration, Instant},
};
use wirebox::{capability, Registry};

const THREADS: usize = 10;
const SCALING_THREADS: [usize; 5] = [1, 2, 4, 8, 12];

fn run_bench_threads<W, F>(threads: usize, mut make_test_fn: W, iters: u64) -> Duration
where
    W: FnMut() -> F,
    F: FnMut() + Send + 'static,
{
    let barrier = Arc::new(Barrier::new(threads + 1));
    let elapsed_handles = Arc::new((0..threads).map(|_| AtomicU64::default()).collect::<Box<[_]>>());

    thread::scope(|s| {
        for i in 0..threads {
            let barrier = barrier.clone();
            let elapsed_handles = elapsed_handles.clone();
            let mut test_fn = make_test_fn();

            s.spawn(move || {
                barrier.wait();
                let start = Instant::now();
                for _ in 0..iters {
                    test_fn();
                }
                elapsed_handles[i].store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
            });
        }

        barrier.wait();
    });

    let nanos: Vec<u64> = elapsed_handles.iter().map(|elapsed| elapsed.load(Ordering::Relaxed)).collect();
    Duration::from_nanos(nanos.iter().sum::<u64>() / nanos.len() as u64)
}

struct Config(u64);
struct Connection(u64);
struct Request(u64);

capability!(Config);
capability!(Connection);
capability!(Request);

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    group.sample_size(30);
    group.warm_up_time(Duration::from_secs(3));

    group.bench_function(BenchmarkId::new("resolve_eager", THREADS), |b| {
        let registry = Registry::new();
        registry.register_singleton::<Config, _>(Config(1)).unwrap();

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let registry = registry.clone();
                    move || {
                        registry.resolve::<Config>().unwrap();
                    }
                },
                (iters + THREADS as u64 - 1) / THREADS as u64,
            )
        });
    });

    group.bench_function(BenchmarkId::new("resolve_lazy", THREADS), |b| {
        let registry = Registry::new();
        registry.register_lazy_singleton::<Connection, _, _>(|| Ok(Connection(1)));

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let registry = registry.clone();
                    move || {
                        registry.resolve::<Connection>().unwrap();
                    }
                },
                (iters + THREADS as u64 - 1) / THREADS as u64,
            )
        });
    });

    group.bench_function(BenchmarkId::new("resolve_transient", THREADS), |b| {
        let registry = Registry::new();
        registry.register_transient::<Request, _, _>(|| Ok(Request(1)));

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let registry = registry.clone();
                    move || {
                        registry.resolve::<Request>().unwrap();
                    }
                },
                (iters + THREADS as u64 - 1) / THREADS as u64,
            )
        });
    });

    for thread_count in SCALING_THREADS {
        group.bench_with_input(BenchmarkId::new("scaling", thread_count), &thread_count, |b, thread_count| {
            let registry = Registry::new();
            registry.register_singleton::<Config, _>(Config(1)).unwrap();
            registry.register_lazy_singleton::<Connection, _, _>({
                let registry = registry.clone();
                move || Ok(Connection(registry.resolve::<Config>()?.0))
            });
            registry.register_transient::<Request, _, _>({
                let registry = registry.clone();
                move || Ok(Request(registry.resolve::<Connection>()?.0))
            });

            b.iter_custom(|iters| {
                run_bench_threads(
                    *thread_count,
                    || {
                        let registry = registry.clone();
                        move || {
                            registry.resolve::<Request>().unwrap();
                        }
                    },
                    (iters + *thread_count as u64 - 1) / *thread_count as u64,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(concurrent_benches, criterion_benchmark);
criterion_main!(concurrent_benches);
