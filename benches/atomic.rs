//! Benchmarks for the atomic cell and spinlock hot paths.
//!
//! - Uncontended increment, compare-and-swap and load on every backend
//! - Uncontended lock/unlock, raw and through `ScopedLock`
//! - Contended increment across a few threads
//!
//! Run with: cargo bench --bench atomic

use std::sync::Arc;
use std::thread;

use axiom_atomic::{AtomicCell, Backend, Builtin, Interlocked, Library, ScopedLock, Spinlock};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_cell_ops<B: Backend>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("cell/{}", B::KIND));
    group.throughput(Throughput::Elements(1));

    let narrow = AtomicCell::<u8, B>::with_backend(0);
    group.bench_function("increment/u8", |b| b.iter(|| black_box(narrow.increment())));

    let word = AtomicCell::<i32, B>::with_backend(0);
    group.bench_function("increment/i32", |b| b.iter(|| black_box(word.increment())));

    let wide = AtomicCell::<u64, B>::with_backend(0);
    group.bench_function("increment/u64", |b| b.iter(|| black_box(wide.increment())));

    group.bench_function("load/u64", |b| b.iter(|| black_box(wide.load())));

    let flag = AtomicCell::<i32, B>::with_backend(0);
    group.bench_function("cas_flip/i32", |b| {
        b.iter(|| {
            let current = flag.load();
            black_box(flag.compare_and_swap(current, current ^ 1))
        })
    });

    group.finish();
}

fn bench_lock<B: Backend>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("spinlock/{}", B::KIND));
    group.throughput(Throughput::Elements(1));

    let lock = Spinlock::<B>::with_backend();
    group.bench_function("lock_unlock", |b| {
        b.iter(|| {
            lock.lock();
            lock.unlock();
        })
    });

    group.bench_function("scoped", |b| {
        b.iter(|| {
            let _guard = ScopedLock::new(black_box(&lock));
        })
    });

    group.finish();
}

fn bench_contended<B: Backend>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("contended/{}", B::KIND));
    const OPS: u64 = 10_000;

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements(threads as u64 * OPS));
        group.bench_with_input(BenchmarkId::new("increment", threads), &threads, |b, &threads| {
            b.iter(|| {
                let cell = Arc::new(AtomicCell::<u64, B>::with_backend(0));
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let cell = cell.clone();
                        thread::spawn(move || {
                            for _ in 0..OPS {
                                cell.increment();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
                debug_assert_eq!(cell.load(), threads as u64 * OPS);
            })
        });
    }

    group.finish();
}

fn bench_all(c: &mut Criterion) {
    bench_cell_ops::<Builtin>(c);
    bench_cell_ops::<Interlocked>(c);
    bench_cell_ops::<Library>(c);

    bench_lock::<Builtin>(c);
    bench_lock::<Interlocked>(c);
    bench_lock::<Library>(c);

    bench_contended::<Builtin>(c);
    bench_contended::<Interlocked>(c);
    bench_contended::<Library>(c);
}

criterion_group!(benches, bench_all);
criterion_main!(benches);
