//! Sparse, compacting two-dimensional store with stable logical indices.
//!
//! Rows and columns are addressed by *logical* index. Each axis keeps an
//! indirection array mapping logical positions to *physical* slots of the
//! backing array, so inserting or removing a row in the middle only shuffles
//! indices, never cell data.
//!
//! # Architecture
//!
//! ```text
//! MatrixStore<E>
//! ├── rows:    Axis { slots: [logical -> physical], active: RoaringBitmap, capacity }
//! ├── columns: Axis { slots: [logical -> physical], active: RoaringBitmap, capacity }
//! └── cells:   Vec<Vec<Option<E>>>   // [physical_row][physical_column]
//! ```
//!
//! # Capacity
//!
//! Capacities are powers of two. They double on demand when an insert or a
//! write needs more slots, and only shrink through compaction: after a
//! removal, while the logical size is below a quarter of the capacity, live
//! slots are packed to the low end and the capacity is halved. Physical
//! capacity therefore never exceeds `4 * max(1, logical_size)` after a
//! removal.
//!
//! # Tolerance
//!
//! Reads outside the logical table return `None`. Writes outside the logical
//! table grow it. Structural corruption (an indirection entry pointing at an
//! inactive slot) is a logic fault and trips a `debug_assert!`.

use roaring::RoaringBitmap;
use tracing::{debug, trace};

use crate::config::StorageConfig;

/// Initial physical capacity used by [`MatrixStore::new`] on both axes.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Most physical slots one axis can address (slot bitmaps are `u32`).
pub const MAX_AXIS_SLOTS: usize = 1 << 31;

/// Occupancy falls below `capacity / COMPACTION_DIVISOR` before compacting.
const COMPACTION_DIVISOR: usize = 4;

/// One axis of the store: logical-to-physical mapping plus slot occupancy.
///
/// Slots below `high_water` are either active or released; slots at or above
/// it have never been handed out since the last compaction.
#[derive(Debug, Clone)]
pub(crate) struct Axis {
    /// Logical index -> physical slot.
    slots: Vec<usize>,
    /// Occupied physical slots.
    active: RoaringBitmap,
    /// Freed slots below `high_water`, reused lowest first.
    released: RoaringBitmap,
    /// One past the highest slot handed out.
    high_water: usize,
    /// Number of physical slots backing this axis.
    capacity: usize,
}

impl Axis {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            active: RoaringBitmap::new(),
            released: RoaringBitmap::new(),
            high_water: 0,
            capacity,
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// Physical slot behind a logical index.
    fn physical(&self, logical: usize) -> Option<usize> {
        let slot = *self.slots.get(logical)?;
        debug_assert!(
            self.active.contains(slot as u32),
            "logical index {logical} maps to inactive slot {slot}"
        );
        Some(slot)
    }

    /// Lowest inactive physical slot (the "next clear bit").
    pub(crate) fn lowest_free(&self) -> usize {
        self.released
            .min()
            .map_or(self.high_water, |slot| slot as usize)
    }

    /// Claims the lowest free slot, or `None` if the axis is full.
    pub(crate) fn allocate(&mut self) -> Option<usize> {
        let slot = self.lowest_free();
        if slot >= self.capacity {
            return None;
        }
        if slot == self.high_water {
            self.high_water += 1;
        } else {
            self.released.remove(slot as u32);
        }
        self.active.insert(slot as u32);
        Some(slot)
    }

    pub(crate) fn release(&mut self, slot: usize) {
        if self.active.remove(slot as u32) {
            self.released.insert(slot as u32);
        }
        debug_assert_eq!(
            self.active.len() + self.released.len(),
            self.high_water as u64,
            "slot bookkeeping out of sync"
        );
    }

    /// Capacity after compaction, or the current capacity if none is due.
    fn shrink_target(&self) -> usize {
        let mut target = self.capacity;
        while target > 1 && self.len() < target / COMPACTION_DIVISOR {
            target /= 2;
        }
        target
    }

    /// Packs every active slot into `[0, len)`.
    ///
    /// Scans from both ends: the lowest inactive slot receives the data of
    /// the highest active slot above it, via `move_slot(from, to)`, until the
    /// two scan positions cross.
    fn pack_low(&mut self, mut move_slot: impl FnMut(usize, usize)) {
        let mut owner = vec![usize::MAX; self.capacity];
        for (logical, &slot) in self.slots.iter().enumerate() {
            owner[slot] = logical;
        }

        self.released.clear();
        self.high_water = self.len();

        let mut low = 0;
        let Some(mut high) = self.active.max().map(|slot| slot as usize) else {
            return;
        };
        loop {
            while low < high && self.active.contains(low as u32) {
                low += 1;
            }
            if low >= high {
                break;
            }

            let logical = owner[high];
            debug_assert_ne!(logical, usize::MAX, "active slot {high} has no owner");
            move_slot(high, low);
            self.slots[logical] = low;
            owner[low] = logical;
            self.active.remove(high as u32);
            self.active.insert(low as u32);

            high = match self.active.max() {
                Some(slot) => slot as usize,
                None => break,
            };
        }
    }
}

/// Next capacity in the doubling sequence that holds `needed` slots, or
/// `None` past [`MAX_AXIS_SLOTS`].
fn grown_capacity(current: usize, needed: usize) -> Option<usize> {
    if needed > MAX_AXIS_SLOTS {
        return None;
    }
    let mut capacity = current.max(1);
    while capacity < needed {
        capacity *= 2;
    }
    Some(capacity)
}

fn empty_row<E>(width: usize) -> Vec<Option<E>> {
    let mut row = Vec::with_capacity(width);
    row.resize_with(width, || None);
    row
}

/// Two-dimensional sparse store with stable logical row/column indices.
///
/// # Example
///
/// ```rust
/// use gridtable_core::MatrixStore;
///
/// let mut store = MatrixStore::new();
/// store.add_row(["a", "b"]);
/// store.insert_row(0, ["x", "y"]);
///
/// assert_eq!(store.get_row(0), Some(vec![Some("x"), Some("y")]));
/// assert_eq!(store.get_row(1), Some(vec![Some("a"), Some("b")]));
/// assert_eq!(store.get_element(7, 7), None);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixStore<E> {
    /// Backing cells, `[physical_row][physical_column]`.
    cells: Vec<Vec<Option<E>>>,
    rows: Axis,
    columns: Axis,
    initial_rows: usize,
    initial_columns: usize,
}

impl<E> Default for MatrixStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MatrixStore<E> {
    /// Creates an empty store with [`DEFAULT_INITIAL_CAPACITY`] on both axes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty store with the given initial physical capacities.
    ///
    /// Capacities are rounded up to the next power of two (minimum 1).
    #[must_use]
    pub fn with_capacity(rows: usize, columns: usize) -> Self {
        let initial_rows = rows.max(1).next_power_of_two();
        let initial_columns = columns.max(1).next_power_of_two();
        let mut cells = Vec::with_capacity(initial_rows);
        cells.resize_with(initial_rows, || empty_row(initial_columns));

        Self {
            cells,
            rows: Axis::new(initial_rows),
            columns: Axis::new(initial_columns),
            initial_rows,
            initial_columns,
        }
    }

    /// Creates an empty store sized from a storage configuration section.
    #[must_use]
    pub fn with_config(config: &StorageConfig) -> Self {
        Self::with_capacity(config.initial_row_capacity, config.initial_column_capacity)
    }

    /// Number of logical rows.
    #[must_use]
    pub fn row_size(&self) -> usize {
        self.rows.len()
    }

    /// Number of logical columns.
    #[must_use]
    pub fn column_size(&self) -> usize {
        self.columns.len()
    }

    /// Logical cell count, `row_size * column_size`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.row_size() * self.column_size()
    }

    /// Returns true if the store has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Physical row slots currently allocated.
    #[must_use]
    pub fn row_capacity(&self) -> usize {
        self.rows.capacity
    }

    /// Physical column slots currently allocated.
    #[must_use]
    pub fn column_capacity(&self) -> usize {
        self.columns.capacity
    }

    /// Appends a logical row, growing columns to fit `elements`.
    ///
    /// Returns the new logical row index, or `None` if no physical slot could
    /// be resolved for it.
    pub fn add_row<I: IntoIterator<Item = E>>(&mut self, elements: I) -> Option<usize> {
        self.insert_row(self.row_size(), elements)
    }

    /// Inserts a logical row at `at`, shifting later rows down by one.
    ///
    /// Only the indirection array moves; cell data of other rows stays in
    /// place. Inserting past the end first extends the table with empty rows.
    pub fn insert_row<I: IntoIterator<Item = E>>(
        &mut self,
        at: usize,
        elements: I,
    ) -> Option<usize> {
        self.extend_rows(at)?;
        self.ensure_row_capacity(self.row_size() + 1)?;
        let slot = self.rows.allocate()?;
        self.rows.slots.insert(at, slot);

        for (column, element) in elements.into_iter().enumerate() {
            self.extend_columns(column.checked_add(1)?)?;
            let physical_column = self.columns.slots[column];
            self.cells[slot][physical_column] = Some(element);
        }

        trace!(row = at, slot, "inserted row");
        Some(at)
    }

    /// Appends a logical column, growing rows to fit `elements`.
    pub fn add_column<I: IntoIterator<Item = E>>(&mut self, elements: I) -> Option<usize> {
        self.insert_column(self.column_size(), elements)
    }

    /// Inserts a logical column at `at`, shifting later columns right by one.
    ///
    /// Mirror of [`insert_row`](Self::insert_row) on the column axis.
    pub fn insert_column<I: IntoIterator<Item = E>>(
        &mut self,
        at: usize,
        elements: I,
    ) -> Option<usize> {
        self.extend_columns(at)?;
        self.ensure_column_capacity(self.column_size() + 1)?;
        let slot = self.columns.allocate()?;
        self.columns.slots.insert(at, slot);

        for (row, element) in elements.into_iter().enumerate() {
            self.extend_rows(row.checked_add(1)?)?;
            let physical_row = self.rows.slots[row];
            self.cells[physical_row][slot] = Some(element);
        }

        trace!(column = at, slot, "inserted column");
        Some(at)
    }

    /// Writes `element` at (`row`, `column`) and returns the previous value.
    ///
    /// Coordinates beyond the logical size extend the table: writing row 5 of
    /// a 3-row table leaves it with 6 rows. A coordinate at or beyond
    /// [`MAX_AXIS_SLOTS`] writes nothing and returns `None`.
    pub fn set(&mut self, element: E, row: usize, column: usize) -> Option<E> {
        if row >= MAX_AXIS_SLOTS || column >= MAX_AXIS_SLOTS {
            return None;
        }
        self.extend_rows(row + 1)?;
        self.extend_columns(column + 1)?;
        let (physical_row, physical_column) = (self.rows.slots[row], self.columns.slots[column]);
        self.cells[physical_row][physical_column].replace(element)
    }

    /// Clears the cell at (`row`, `column`) and returns what it held.
    ///
    /// Unlike [`set`](Self::set), clearing never grows the table.
    pub fn unset(&mut self, row: usize, column: usize) -> Option<E> {
        let physical_row = self.rows.physical(row)?;
        let physical_column = self.columns.physical(column)?;
        self.cells[physical_row][physical_column].take()
    }

    /// Element at (`row`, `column`), or `None` for empty or out-of-range cells.
    #[must_use]
    pub fn get_element(&self, row: usize, column: usize) -> Option<&E> {
        let physical_row = self.rows.physical(row)?;
        let physical_column = self.columns.physical(column)?;
        self.cells[physical_row][physical_column].as_ref()
    }

    /// Removes a logical row and returns its cells in logical column order.
    ///
    /// Later rows shift up by one. Compaction runs afterwards if occupancy
    /// fell below a quarter of the row capacity.
    pub fn remove_row(&mut self, row: usize) -> Option<Vec<Option<E>>> {
        let physical_row = self.rows.physical(row)?;
        let removed = self
            .columns
            .slots
            .iter()
            .map(|&physical_column| self.cells[physical_row][physical_column].take())
            .collect();

        self.rows.release(physical_row);
        self.rows.slots.remove(row);
        trace!(row, slot = physical_row, "removed row");

        self.compact_rows();
        Some(removed)
    }

    /// Removes a logical column and returns its cells in logical row order.
    pub fn remove_column(&mut self, column: usize) -> Option<Vec<Option<E>>> {
        let physical_column = self.columns.physical(column)?;
        let removed = self
            .rows
            .slots
            .iter()
            .map(|&physical_row| self.cells[physical_row][physical_column].take())
            .collect();

        self.columns.release(physical_column);
        self.columns.slots.remove(column);
        trace!(column, slot = physical_column, "removed column");

        self.compact_columns();
        Some(removed)
    }

    /// Drops every cell and returns to the initial capacities.
    pub fn clear(&mut self) {
        *self = Self::with_capacity(self.initial_rows, self.initial_columns);
    }

    /// Appends empty logical rows until there are at least `count`.
    fn extend_rows(&mut self, count: usize) -> Option<()> {
        if count <= self.row_size() {
            return Some(());
        }
        self.ensure_row_capacity(count)?;
        while self.row_size() < count {
            let slot = self.rows.allocate()?;
            self.rows.slots.push(slot);
        }
        Some(())
    }

    /// Appends empty logical columns until there are at least `count`.
    fn extend_columns(&mut self, count: usize) -> Option<()> {
        if count <= self.column_size() {
            return Some(());
        }
        self.ensure_column_capacity(count)?;
        while self.column_size() < count {
            let slot = self.columns.allocate()?;
            self.columns.slots.push(slot);
        }
        Some(())
    }

    fn ensure_row_capacity(&mut self, needed: usize) -> Option<()> {
        let old = self.rows.capacity;
        if needed <= old {
            return Some(());
        }
        let capacity = grown_capacity(old, needed)?;
        let width = self.columns.capacity;
        self.cells.resize_with(capacity, || empty_row(width));
        self.rows.capacity = capacity;
        debug!(
            axis = "rows",
            old_capacity = old,
            new_capacity = capacity,
            "grew matrix capacity"
        );
        Some(())
    }

    fn ensure_column_capacity(&mut self, needed: usize) -> Option<()> {
        let old = self.columns.capacity;
        if needed <= old {
            return Some(());
        }
        let capacity = grown_capacity(old, needed)?;
        for row in &mut self.cells {
            row.resize_with(capacity, || None);
        }
        self.columns.capacity = capacity;
        debug!(
            axis = "columns",
            old_capacity = old,
            new_capacity = capacity,
            "grew matrix capacity"
        );
        Some(())
    }

    fn compact_rows(&mut self) {
        let old = self.rows.capacity;
        let target = self.rows.shrink_target();
        if target == old {
            return;
        }

        let cells = &mut self.cells;
        self.rows.pack_low(|from, to| cells.swap(from, to));
        self.cells.truncate(target);
        self.cells.shrink_to_fit();
        self.rows.capacity = target;
        debug!(
            axis = "rows",
            live = self.rows.len(),
            old_capacity = old,
            new_capacity = target,
            "compacted matrix"
        );
    }

    fn compact_columns(&mut self) {
        let old = self.columns.capacity;
        let target = self.columns.shrink_target();
        if target == old {
            return;
        }

        let cells = &mut self.cells;
        self.columns.pack_low(|from, to| {
            for row in cells.iter_mut() {
                row.swap(from, to);
            }
        });
        for row in &mut self.cells {
            row.truncate(target);
            row.shrink_to_fit();
        }
        self.columns.capacity = target;
        debug!(
            axis = "columns",
            live = self.columns.len(),
            old_capacity = old,
            new_capacity = target,
            "compacted matrix"
        );
    }
}

impl<E: Clone> MatrixStore<E> {
    /// Materializes a logical row as a dense vector in logical column order.
    #[must_use]
    pub fn get_row(&self, row: usize) -> Option<Vec<Option<E>>> {
        let physical_row = self.rows.physical(row)?;
        let cells = &self.cells[physical_row];
        Some(
            self.columns
                .slots
                .iter()
                .map(|&physical_column| cells[physical_column].clone())
                .collect(),
        )
    }

    /// Materializes a logical column as a dense vector in logical row order.
    #[must_use]
    pub fn get_column(&self, column: usize) -> Option<Vec<Option<E>>> {
        let physical_column = self.columns.physical(column)?;
        Some(
            self.rows
                .slots
                .iter()
                .map(|&physical_row| self.cells[physical_row][physical_column].clone())
                .collect(),
        )
    }
}
