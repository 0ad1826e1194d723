//! Basic benchmarks for the `fixed_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use fixed_pool::FixedObjectPool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = usize;
const TEST_VALUE: TestItem = 1024;
const CAPACITY: usize = 64;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_basic");

    group.bench_function("build_empty", |b| {
        b.iter(|| {
            drop(black_box(FixedObjectPool::<TestItem, CAPACITY>::new()));
        });
    });

    group.bench_function("allocate_first", |b| {
        b.iter_custom(|iters| {
            let mut pools = iter::repeat_with(FixedObjectPool::<TestItem, CAPACITY>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let start = Instant::now();

            for pool in &mut pools {
                _ = black_box(pool.allocate_and_construct(|| black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    // Worst case for first-fit: only the last slot is vacant.
    group.bench_function("allocate_last", |b| {
        b.iter_custom(|iters| {
            let mut pools = iter::repeat_with(FixedObjectPool::<TestItem, CAPACITY>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            for pool in &mut pools {
                for _ in 0..CAPACITY - 1 {
                    _ = pool.allocate_and_construct(|| TEST_VALUE);
                }
            }

            let start = Instant::now();

            for pool in &mut pools {
                _ = black_box(pool.allocate_and_construct(|| black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    group.bench_function("allocate_free", |b| {
        let mut pool = FixedObjectPool::<TestItem, CAPACITY>::new();

        b.iter(|| {
            let handle = pool.allocate_and_construct(|| black_box(TEST_VALUE));

            if let Some(handle) = handle {
                pool.free(black_box(handle.as_ptr()));
            }
        });
    });

    group.bench_function("free_rejected", |b| {
        let mut pool = FixedObjectPool::<TestItem, CAPACITY>::new();
        let outside = TEST_VALUE;

        b.iter(|| {
            pool.free(black_box(&raw const outside));
        });
    });

    group.finish();
}
