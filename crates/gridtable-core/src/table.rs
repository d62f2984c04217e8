//! Table facade over [`MatrixStore`].
//!
//! `Table<E>` is what callers see: rows, columns, optional column headers and
//! row/column views. It offers two flavours of every access:
//!
//! - tolerant pass-through (`cell`, `set`): out-of-range reads are `None`,
//!   out-of-range writes grow the table, for callers that build incrementally;
//! - validated (`get`, `replace`, `row`, `remove_row`, ...): out-of-range
//!   coordinates come back as [`Error::RowOutOfBounds`] /
//!   [`Error::ColumnOutOfBounds`].

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::matrix::MatrixStore;
use crate::sorted_index::SortedIndex;

/// In-memory table of cells of type `E`.
#[derive(Debug, Clone)]
pub struct Table<E> {
    store: MatrixStore<E>,
    /// Header per logical column; may be shorter than the column count.
    headers: Vec<Option<String>>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Table<E> {
    /// Creates an empty table with default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(MatrixStore::new())
    }

    /// Creates an empty table sized from a storage configuration section.
    #[must_use]
    pub fn with_config(config: &StorageConfig) -> Self {
        Self::from_store(MatrixStore::with_config(config))
    }

    /// Creates an empty table whose first columns carry `headers`.
    ///
    /// The named columns exist immediately, with no cells.
    pub fn with_headers<I, S>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (column, header) in headers.into_iter().enumerate() {
            table.set_header(column, header)?;
        }
        Ok(table)
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: MatrixStore<E>) -> Self {
        Self {
            store,
            headers: Vec::new(),
        }
    }

    /// The underlying matrix store.
    #[must_use]
    pub fn store(&self) -> &MatrixStore<E> {
        &self.store
    }

    /// Number of logical rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.store.row_size()
    }

    /// Number of logical columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.store.column_size()
    }

    /// Number of cells, `row_count * column_count`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.store.size()
    }

    /// Returns true if the table has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.row_count() {
            Ok(())
        } else {
            Err(Error::RowOutOfBounds {
                index,
                len: self.row_count(),
            })
        }
    }

    fn check_column(&self, index: usize) -> Result<()> {
        if index < self.column_count() {
            Ok(())
        } else {
            Err(Error::ColumnOutOfBounds {
                index,
                len: self.column_count(),
            })
        }
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Header of a logical column, if one was set.
    #[must_use]
    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers.get(column)?.as_deref()
    }

    /// Names a logical column, growing the table to include it.
    ///
    /// Fails with [`Error::SlotUnavailable`] if the column cannot be created.
    pub fn set_header(&mut self, column: usize, header: impl Into<String>) -> Result<()> {
        if column >= self.column_count() {
            self.store
                .insert_column(column, std::iter::empty())
                .ok_or(Error::SlotUnavailable("column"))?;
        }
        if self.headers.len() <= column {
            self.headers.resize(column + 1, None);
        }
        self.headers[column] = Some(header.into());
        Ok(())
    }

    /// Logical index of the first column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.as_deref() == Some(name))
    }

    /// Logical index of the column named `name`, as a `Result`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    // =========================================================================
    // Tolerant access
    // =========================================================================

    /// Cell at (`row`, `column`); `None` for empty or out-of-range cells.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&E> {
        self.store.get_element(row, column)
    }

    /// Writes a cell, growing the table if needed, and returns the old value.
    pub fn set(&mut self, row: usize, column: usize, value: E) -> Option<E> {
        self.store.set(value, row, column)
    }

    /// Clears a cell and returns what it held. Never grows the table.
    pub fn unset(&mut self, row: usize, column: usize) -> Option<E> {
        self.store.unset(row, column)
    }

    // =========================================================================
    // Validated access
    // =========================================================================

    /// Cell at (`row`, `column`) with bounds checking.
    pub fn get(&self, row: usize, column: usize) -> Result<Option<&E>> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.store.get_element(row, column))
    }

    /// Overwrites an existing cell position without growing the table.
    pub fn replace(&mut self, row: usize, column: usize, value: E) -> Result<Option<E>> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.store.set(value, row, column))
    }

    /// Appends a row and returns its index.
    pub fn push_row<I: IntoIterator<Item = E>>(&mut self, values: I) -> Result<usize> {
        self.store
            .add_row(values)
            .ok_or(Error::SlotUnavailable("row"))
    }

    /// Inserts a row at `at` (at most `row_count`), shifting later rows down.
    pub fn insert_row<I: IntoIterator<Item = E>>(&mut self, at: usize, values: I) -> Result<usize> {
        if at > self.row_count() {
            return Err(Error::RowOutOfBounds {
                index: at,
                len: self.row_count(),
            });
        }
        self.store
            .insert_row(at, values)
            .ok_or(Error::SlotUnavailable("row"))
    }

    /// Appends a column and returns its index.
    pub fn push_column<I: IntoIterator<Item = E>>(&mut self, values: I) -> Result<usize> {
        self.store
            .add_column(values)
            .ok_or(Error::SlotUnavailable("column"))
    }

    /// Inserts a column at `at` (at most `column_count`), shifting headers with it.
    pub fn insert_column<I: IntoIterator<Item = E>>(
        &mut self,
        at: usize,
        values: I,
    ) -> Result<usize> {
        if at > self.column_count() {
            return Err(Error::ColumnOutOfBounds {
                index: at,
                len: self.column_count(),
            });
        }
        let column = self
            .store
            .insert_column(at, values)
            .ok_or(Error::SlotUnavailable("column"))?;
        if column < self.headers.len() {
            self.headers.insert(column, None);
        }
        Ok(column)
    }

    /// Removes a row and returns its cells.
    pub fn remove_row(&mut self, row: usize) -> Result<Vec<Option<E>>> {
        self.check_row(row)?;
        let len = self.row_count();
        self.store
            .remove_row(row)
            .ok_or(Error::RowOutOfBounds { index: row, len })
    }

    /// Removes a column (and its header) and returns its cells.
    pub fn remove_column(&mut self, column: usize) -> Result<Vec<Option<E>>> {
        self.check_column(column)?;
        let len = self.column_count();
        let removed = self
            .store
            .remove_column(column)
            .ok_or(Error::ColumnOutOfBounds { index: column, len })?;
        if column < self.headers.len() {
            self.headers.remove(column);
        }
        Ok(removed)
    }

    /// Removes every row, column and header.
    pub fn clear(&mut self) {
        self.store.clear();
        self.headers.clear();
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Borrowed view of a row.
    pub fn row(&self, index: usize) -> Result<RowRef<'_, E>> {
        self.check_row(index)?;
        Ok(RowRef { table: self, index })
    }

    /// Borrowed view of a column.
    pub fn column(&self, index: usize) -> Result<ColumnRef<'_, E>> {
        self.check_column(index)?;
        Ok(ColumnRef { table: self, index })
    }

    /// Every row, in logical order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_, E>> + '_ {
        (0..self.row_count()).map(move |index| RowRef { table: self, index })
    }

    /// Every column, in logical order.
    pub fn columns(&self) -> impl Iterator<Item = ColumnRef<'_, E>> + '_ {
        (0..self.column_count()).map(move |index| ColumnRef { table: self, index })
    }
}

impl<E: Clone + Ord> Table<E> {
    /// Builds a sorted secondary index from a column's current contents.
    ///
    /// Source positions in the index are logical row indices. The index is a
    /// snapshot; later table edits do not update it.
    pub fn index_column(&self, column: usize) -> Result<SortedIndex<Option<E>>> {
        self.check_column(column)?;
        let mut index = SortedIndex::with_capacity(self.row_count());
        index.extend((0..self.row_count()).map(|row| self.cell(row, column).cloned()));
        Ok(index)
    }
}

/// Borrowed view of one logical row.
#[derive(Debug)]
pub struct RowRef<'a, E> {
    table: &'a Table<E>,
    index: usize,
}

impl<E> Clone for RowRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for RowRef<'_, E> {}

impl<'a, E> RowRef<'a, E> {
    /// Logical row index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cells (the table's column count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.column_count()
    }

    /// Returns true if the table has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell in this row at `column`.
    #[must_use]
    pub fn get(&self, column: usize) -> Option<&'a E> {
        self.table.cell(self.index, column)
    }

    /// Cells in logical column order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'a E>> + 'a {
        let (table, index) = (self.table, self.index);
        (0..table.column_count()).map(move |column| table.cell(index, column))
    }
}

impl<E: Clone> RowRef<'_, E> {
    /// Owned copy of the row's cells.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Option<E>> {
        self.table.store.get_row(self.index).unwrap_or_default()
    }
}

/// Borrowed view of one logical column.
#[derive(Debug)]
pub struct ColumnRef<'a, E> {
    table: &'a Table<E>,
    index: usize,
}

impl<E> Clone for ColumnRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ColumnRef<'_, E> {}

impl<'a, E> ColumnRef<'a, E> {
    /// Logical column index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Column header, if one was set.
    #[must_use]
    pub fn header(&self) -> Option<&'a str> {
        self.table.header(self.index)
    }

    /// Number of cells (the table's row count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.row_count()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell in this column at `row`.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&'a E> {
        self.table.cell(row, self.index)
    }

    /// Cells in logical row order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'a E>> + 'a {
        let (table, index) = (self.table, self.index);
        (0..table.row_count()).map(move |row| table.cell(row, index))
    }
}

impl<E: Clone> ColumnRef<'_, E> {
    /// Owned copy of the column's cells.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Option<E>> {
        self.table.store.get_column(self.index).unwrap_or_default()
    }
}
