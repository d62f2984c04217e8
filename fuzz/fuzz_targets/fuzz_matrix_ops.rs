//! Fuzz target for matrix store edits.
//!
//! Replays an arbitrary sequence of row/column inserts, removals and cell
//! writes against both `MatrixStore` and a plain `Vec<Vec<Option<u8>>>`
//! model, and checks after every step that the logical contents agree and
//! that compaction kept capacity within four times the logical size.

#![no_main]

use arbitrary::Arbitrary;
use gridtable_core::MatrixStore;
use libfuzzer_sys::fuzz_target;

/// Coordinates are bounded so growth stays cheap.
const MAX_COORD: usize = 64;

#[derive(Debug, Arbitrary)]
enum Op {
    InsertRow { at: u8, values: Vec<u8> },
    RemoveRow { at: u8 },
    InsertColumn { at: u8, values: Vec<u8> },
    RemoveColumn { at: u8 },
    Set { row: u8, column: u8, value: u8 },
    Unset { row: u8, column: u8 },
    Clear,
}

struct Model {
    rows: Vec<Vec<Option<u8>>>,
    columns: usize,
}

impl Model {
    fn grow(&mut self, rows: usize, columns: usize) {
        self.columns = self.columns.max(columns);
        while self.rows.len() < rows {
            self.rows.push(Vec::new());
        }
        for row in &mut self.rows {
            row.resize(self.columns, None);
        }
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut store = MatrixStore::with_capacity(1, 1);
    let mut model = Model {
        rows: Vec::new(),
        columns: 0,
    };

    for op in ops.into_iter().take(256) {
        match op {
            Op::InsertRow { at, values } => {
                let at = usize::from(at) % MAX_COORD;
                let values: Vec<u8> = values.into_iter().take(MAX_COORD).collect();
                assert_eq!(store.insert_row(at, values.iter().copied()), Some(at));
                model.grow(at, values.len());
                let mut row: Vec<Option<u8>> = values.into_iter().map(Some).collect();
                row.resize(model.columns, None);
                model.rows.insert(at, row);
            }
            Op::RemoveRow { at } => {
                let at = usize::from(at);
                let expected = (at < model.rows.len()).then(|| model.rows.remove(at));
                assert_eq!(store.remove_row(at), expected);
                if expected.is_some() {
                    assert!(store.row_capacity() <= 4 * store.row_size().max(1));
                }
            }
            Op::InsertColumn { at, values } => {
                let at = usize::from(at) % MAX_COORD;
                let values: Vec<u8> = values.into_iter().take(MAX_COORD).collect();
                assert_eq!(store.insert_column(at, values.iter().copied()), Some(at));
                model.grow(values.len(), at);
                for (row, cells) in model.rows.iter_mut().enumerate() {
                    cells.insert(at, values.get(row).copied());
                }
                model.columns += 1;
            }
            Op::RemoveColumn { at } => {
                let at = usize::from(at);
                let expected = (at < model.columns).then(|| {
                    model.columns -= 1;
                    model.rows.iter_mut().map(|row| row.remove(at)).collect::<Vec<_>>()
                });
                assert_eq!(store.remove_column(at), expected);
                if expected.is_some() {
                    assert!(store.column_capacity() <= 4 * store.column_size().max(1));
                }
            }
            Op::Set { row, column, value } => {
                let (row, column) = (usize::from(row) % MAX_COORD, usize::from(column) % MAX_COORD);
                model.grow(row + 1, column + 1);
                let previous = model.rows[row][column].replace(value);
                assert_eq!(store.set(value, row, column), previous);
            }
            Op::Unset { row, column } => {
                let (row, column) = (usize::from(row), usize::from(column));
                let previous = model
                    .rows
                    .get_mut(row)
                    .and_then(|cells| cells.get_mut(column))
                    .and_then(Option::take);
                assert_eq!(store.unset(row, column), previous);
            }
            Op::Clear => {
                store.clear();
                model.rows.clear();
                model.columns = 0;
            }
        }

        assert_eq!(store.row_size(), model.rows.len());
        assert_eq!(store.column_size(), model.columns);
        for (row, cells) in model.rows.iter().enumerate() {
            assert_eq!(store.get_row(row).as_ref(), Some(cells));
        }
    }
});
