//! Table shared across threads behind one coarse read/write lock.
//!
//! There is a single lock for the whole table: no per-row or per-cell
//! locking. Readers run concurrently; a writer excludes everyone. Work runs
//! inside a closure while the guard is held and the guard is released when
//! the closure returns or unwinds.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::table::Table;

/// Cloneable handle to a table guarded by a table-wide `RwLock`.
///
/// # Example
///
/// ```rust
/// use gridtable_core::{SharedTable, Table};
///
/// let shared = SharedTable::new(Table::new());
/// shared.write(|table| table.set(0, 0, 42));
///
/// assert_eq!(shared.read(|table| table.cell(0, 0).copied()), Some(42));
/// ```
#[derive(Debug)]
pub struct SharedTable<E> {
    inner: Arc<RwLock<Table<E>>>,
}

impl<E> Clone for SharedTable<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for SharedTable<E> {
    fn default() -> Self {
        Self::new(Table::new())
    }
}

impl<E> SharedTable<E> {
    /// Wraps a table for shared access.
    #[must_use]
    pub fn new(table: Table<E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Runs `work` under the shared read lock.
    pub fn read<R>(&self, work: impl FnOnce(&Table<E>) -> R) -> R {
        let guard = self.inner.read();
        work(&guard)
    }

    /// Runs `work` under the exclusive write lock.
    pub fn write<R>(&self, work: impl FnOnce(&mut Table<E>) -> R) -> R {
        let mut guard = self.inner.write();
        work(&mut guard)
    }

    /// Number of handles sharing this table.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns the table if this is the last handle, otherwise gives the handle back.
    pub fn try_into_inner(self) -> Result<Table<E>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<E> From<Table<E>> for SharedTable<E> {
    fn from(table: Table<E>) -> Self {
        Self::new(table)
    }
}
