//! Engine benchmarks: write churn per backend and cached reads.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use chronos_cache::{LazyAttributeStorage, NoChangeHandler};
use chronos_core::traits::{ITemporalAttribute, ITemporalSet};
use chronos_core::{Period, Tick};
use chronos_storage::{CompactAttributeStorage, TreeAttributeStorage, TreeSetStorage};
use chronos_temporal::{TemporalAttribute, TemporalSet};
use test_fixtures::{p, t, RangeSource};

/// Deterministic pseudo-random write pattern over `[0, 1000)`.
fn churn_periods(n: usize) -> Vec<(Period<Tick>, u8)> {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..n)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let start = (seed % 990) as i64;
            let len = 1 + (seed >> 32) as i64 % 10;
            (p(start, start + len), (seed % 4) as u8)
        })
        .collect()
}

fn bench_put_churn_tree(c: &mut Criterion) {
    let writes = churn_periods(1_000);
    c.bench_function("attribute_put_churn_tree_1000", |b| {
        b.iter_batched(
            TemporalAttribute::<Tick, u8, TreeAttributeStorage<Tick, u8>>::default,
            |mut attr| {
                for (period, value) in &writes {
                    attr.put(period.clone(), *value).unwrap();
                }
                black_box(attr)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_put_churn_compact(c: &mut Criterion) {
    let writes = churn_periods(1_000);
    c.bench_function("attribute_put_churn_compact_1000", |b| {
        b.iter_batched(
            TemporalAttribute::<Tick, u8, CompactAttributeStorage<Tick, u8>>::default,
            |mut attr| {
                for (period, value) in &writes {
                    attr.put(period.clone(), *value).unwrap();
                }
                black_box(attr)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_remove_churn(c: &mut Criterion) {
    let writes = churn_periods(1_000);
    c.bench_function("attribute_remove_churn_1000", |b| {
        b.iter_batched(
            || {
                let mut attr: TemporalAttribute<Tick, u8, TreeAttributeStorage<Tick, u8>> = TemporalAttribute::default();
                attr.put(p(0, 1_000), 0).unwrap();
                attr
            },
            |mut attr| {
                for (period, _) in &writes {
                    attr.remove(period).unwrap();
                }
                black_box(attr)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_set_put_churn(c: &mut Criterion) {
    let writes = churn_periods(1_000);
    c.bench_function("set_put_churn_1000", |b| {
        b.iter_batched(
            TemporalSet::<Tick, u8, TreeSetStorage<Tick, u8>>::default,
            |mut set| {
                for (period, value) in &writes {
                    set.put(period.clone(), *value).unwrap();
                }
                black_box(set)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_lazy_cached_reads(c: &mut Criterion) {
    let entries: Vec<(Period<Tick>, u8)> = (0..1_000).map(|i| (p(i * 2, i * 2 + 1), (i % 7) as u8)).collect();
    let source = RangeSource::new(entries).unwrap();
    let attr: TemporalAttribute<Tick, u8, LazyAttributeStorage<Tick, u8, RangeSource<u8>, NoChangeHandler>> =
        TemporalAttribute::new(LazyAttributeStorage::read_only(source));
    attr.len().unwrap();

    c.bench_function("lazy_cached_get_1000", |b| {
        b.iter(|| {
            for i in 0..1_000 {
                black_box(attr.get(&t(i * 2)).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_put_churn_tree,
    bench_put_churn_compact,
    bench_remove_churn,
    bench_set_put_churn,
    bench_lazy_cached_reads,
);
criterion_main!(benches);
