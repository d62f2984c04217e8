//! Stress tests for concurrent `SharedTable` operations.
//!
//! Threads run a fixed number of operations each instead of time-based
//! loops, so writers always finish.
#![allow(clippy::cast_possible_truncation)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use gridtable_core::{select, Condition, SharedTable, Table};

/// Smoke test: 4 readers + 4 writers x 50 ops
#[test]
fn test_stress_smoke_8_threads() {
    run_table_stress(4, 4, 50);
}

/// Heavier mix with insert-in-middle and remove-from-middle churn
#[test]
fn test_stress_churn_16_threads() {
    run_table_stress(8, 8, 200);
}

fn run_table_stress(readers: usize, writers: usize, ops_per_thread: u64) {
    let shared: SharedTable<u64> =
        SharedTable::new(Table::with_headers(["writer", "seq", "check"]).unwrap());
    let reads = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let mut handles = Vec::new();
    for writer in 0..writers as u64 {
        let shared = shared.clone();
        handles.push(thread::spawn(move || {
            for seq in 0..ops_per_thread {
                shared.write(|table| {
                    let at = (seq as usize * 7) % (table.row_count() + 1);
                    table
                        .insert_row(at, [writer, seq, writer ^ seq])
                        .expect("insert row");
                    if seq % 4 == 3 {
                        let victim = (seq as usize * 13) % table.row_count();
                        table.remove_row(victim).expect("remove row");
                    }
                });
            }
        }));
    }
    for _ in 0..readers {
        let shared = shared.clone();
        let reads = Arc::clone(&reads);
        handles.push(thread::spawn(move || {
            for _ in 0..ops_per_thread {
                shared.read(|table| {
                    for row in table.rows() {
                        match (row.get(0), row.get(1), row.get(2)) {
                            (Some(w), Some(s), Some(c)) => assert_eq!(w ^ s, *c),
                            other => panic!("torn row {}: {other:?}", row.index()),
                        }
                    }
                    let index = table.index_column(2).expect("index");
                    let indexed = select::select_indexed(&index, 2, &Condition::is_not_null(2));
                    assert_eq!(indexed.map(|rows| rows.len()), Some(table.row_count()));
                });
                reads.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("stress thread panicked");
    }

    let removed_per_writer = ops_per_thread / 4;
    let expected = writers as u64 * (ops_per_thread - removed_per_writer);
    let (rows, capacity) = shared.read(|table| (table.row_count(), table.store().row_capacity()));
    assert_eq!(rows as u64, expected);
    assert!(capacity <= 4 * rows.max(1) || capacity <= 8);
    assert_eq!(reads.load(Ordering::Relaxed), readers as u64 * ops_per_thread);

    println!(
        "stress: {readers} readers, {writers} writers, {ops_per_thread} ops each in {:?}",
        start.elapsed()
    );
}
