//! # Ring Buffer Benchmark
//!
//! Measures:
//! 1. Steady-state push with eviction (bounded queue under overload)
//! 2. Push/pop churn (one producer, one drain per tick)
//! 3. Positional insert/remove at the middle of a full buffer
//!
//! Target: push and pop stay flat regardless of capacity.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use foundations_core::RingBuffer;

fn bench_push_overflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_push_overflow");

    for capacity in [32, 1_024, 65_536] {
        let mut ring = RingBuffer::new(capacity).unwrap();
        ring.extend(0..capacity as u64);

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            let mut next = 0_u64;
            b.iter(|| {
                next += 1;
                black_box(ring.push(next));
            });
        });
    }

    group.finish();
}

fn bench_push_pop(c: &mut Criterion) {
    let mut ring = RingBuffer::new(30).unwrap();

    c.bench_function("ring_push_pop", |b| {
        b.iter(|| {
            ring.push(black_box(7_u32));
            black_box(ring.pop().unwrap());
        });
    });
}

fn bench_insert_remove_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_insert_remove_middle");

    for capacity in [32, 256, 2_048] {
        let mut ring = RingBuffer::new(capacity).unwrap();
        ring.extend(0..capacity as u64);
        let middle = capacity / 2;

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &middle, |b, &middle| {
            b.iter(|| {
                ring.insert_at(black_box(1), middle).unwrap();
                black_box(ring.remove_at(middle).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_overflow, bench_push_pop, bench_insert_remove_middle);
criterion_main!(benches);
