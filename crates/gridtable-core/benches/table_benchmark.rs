//! Benchmarks for row churn on the matrix store and range lookups on the
//! sorted index versus a full column scan.
#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridtable_core::{select, Condition, MatrixStore, SortedIndex, Table};

const DATASET_SIZES: &[usize] = &[1_000, 10_000];

fn create_test_table(size: usize) -> Table<u64> {
    let mut table = Table::with_headers(["id", "score"]).unwrap();
    let mut x = 42u64;
    for id in 0..size as u64 {
        x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        table.set(id as usize, 0, id);
        table.set(id as usize, 1, x % 10_000);
    }
    table
}

fn bench_row_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_row_churn");

    for &size in DATASET_SIZES {
        group.bench_with_input(BenchmarkId::new("insert_middle", size), &size, |b, &size| {
            b.iter(|| {
                let mut store = MatrixStore::new();
                for i in 0..size {
                    store.insert_row(store.row_size() / 2, [i, i]);
                }
                black_box(store.row_size())
            });
        });

        group.bench_with_input(BenchmarkId::new("fifo_remove", size), &size, |b, &size| {
            b.iter(|| {
                let mut store = MatrixStore::new();
                for i in 0..size {
                    store.add_row([i]);
                }
                while store.remove_row(0).is_some() {}
                black_box(store.row_capacity())
            });
        });
    }

    group.finish();
}

fn bench_range_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_range_lookup");

    for &size in DATASET_SIZES {
        let table = create_test_table(size);
        let index = table.index_column(1).expect("index");
        let condition = Condition::between(1, 4_000, 4_100);

        group.bench_with_input(
            BenchmarkId::new("indexed", size),
            &(&index, &condition),
            |b, (idx, cond)| {
                b.iter(|| black_box(select::select_indexed(idx, 1, cond)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("scan", size),
            &(&table, &condition),
            |b, (tbl, cond)| {
                b.iter(|| black_box(select::select(tbl, cond)));
            },
        );
    }

    group.finish();
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_index_build");

    for &size in DATASET_SIZES {
        let table = create_test_table(size);
        let scores: Vec<u64> = (0..size).filter_map(|row| table.cell(row, 1).copied()).collect();

        group.bench_with_input(BenchmarkId::new("add", size), &scores, |b, scores| {
            b.iter(|| black_box(scores.iter().copied().collect::<SortedIndex<u64>>()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_churn, bench_range_lookup, bench_index_build);
criterion_main!(benches);
