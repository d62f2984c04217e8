//! Row selection and joins over a [`Table`].
//!
//! Selection is a nested-loop filter over cell reads. When a
//! [`SortedIndex`] exists for the filtered column, single-column equality
//! and range conditions can be answered from the index instead.
//!
//! Null cells never satisfy a comparison; only `IsNull` matches them.
//!
//! ```rust
//! use gridtable_core::{select, Condition, Table};
//!
//! let mut table = Table::new();
//! for (row, price) in [10, 25, 40].into_iter().enumerate() {
//!     table.set(row, 0, price);
//! }
//!
//! let rows = select::select(&table, &Condition::gt(0, 20));
//! assert_eq!(rows, vec![1, 2]);
//! ```

use tracing::warn;

use crate::sorted_index::SortedIndex;
use crate::table::Table;

/// A predicate over the cells of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<E> {
    /// Equality comparison: cell == value
    Eq {
        /// Logical column
        column: usize,
        /// Value to compare against
        value: E,
    },
    /// Not equal comparison: cell != value (null cells do not match)
    Neq {
        /// Logical column
        column: usize,
        /// Value to compare against
        value: E,
    },
    /// Greater than comparison: cell > value
    Gt {
        /// Logical column
        column: usize,
        /// Value to compare against
        value: E,
    },
    /// Less than comparison: cell < value
    Lt {
        /// Logical column
        column: usize,
        /// Value to compare against
        value: E,
    },
    /// Inclusive range: low <= cell <= high
    Between {
        /// Logical column
        column: usize,
        /// Lower bound (inclusive)
        low: E,
        /// Upper bound (inclusive)
        high: E,
    },
    /// Cell is empty
    IsNull {
        /// Logical column
        column: usize,
    },
    /// Cell holds a value
    IsNotNull {
        /// Logical column
        column: usize,
    },
    /// Logical AND of multiple conditions
    And {
        /// Conditions to AND together
        conditions: Vec<Condition<E>>,
    },
    /// Logical OR of multiple conditions
    Or {
        /// Conditions to OR together
        conditions: Vec<Condition<E>>,
    },
}

impl<E> Condition<E> {
    /// Creates an equality condition.
    #[must_use]
    pub fn eq(column: usize, value: E) -> Self {
        Self::Eq { column, value }
    }

    /// Creates a not-equal condition.
    #[must_use]
    pub fn neq(column: usize, value: E) -> Self {
        Self::Neq { column, value }
    }

    /// Creates a greater-than condition.
    #[must_use]
    pub fn gt(column: usize, value: E) -> Self {
        Self::Gt { column, value }
    }

    /// Creates a less-than condition.
    #[must_use]
    pub fn lt(column: usize, value: E) -> Self {
        Self::Lt { column, value }
    }

    /// Creates an inclusive range condition.
    #[must_use]
    pub fn between(column: usize, low: E, high: E) -> Self {
        Self::Between { column, low, high }
    }

    /// Creates an is-null condition.
    #[must_use]
    pub fn is_null(column: usize) -> Self {
        Self::IsNull { column }
    }

    /// Creates an is-not-null condition.
    #[must_use]
    pub fn is_not_null(column: usize) -> Self {
        Self::IsNotNull { column }
    }

    /// Creates an AND condition.
    #[must_use]
    pub fn and(conditions: Vec<Self>) -> Self {
        Self::And { conditions }
    }

    /// Creates an OR condition.
    #[must_use]
    pub fn or(conditions: Vec<Self>) -> Self {
        Self::Or { conditions }
    }

    /// Column this condition reads, if it reads exactly one.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Eq { column, .. }
            | Self::Neq { column, .. }
            | Self::Gt { column, .. }
            | Self::Lt { column, .. }
            | Self::Between { column, .. }
            | Self::IsNull { column }
            | Self::IsNotNull { column } => Some(*column),
            Self::And { .. } | Self::Or { .. } => None,
        }
    }
}

impl<E: Ord> Condition<E> {
    /// Evaluates the condition against one logical row.
    #[must_use]
    pub fn matches(&self, table: &Table<E>, row: usize) -> bool {
        match self {
            Self::Eq { column, value } => table.cell(row, *column) == Some(value),
            Self::Neq { column, value } => {
                table.cell(row, *column).is_some_and(|cell| cell != value)
            }
            Self::Gt { column, value } => table.cell(row, *column).is_some_and(|cell| cell > value),
            Self::Lt { column, value } => table.cell(row, *column).is_some_and(|cell| cell < value),
            Self::Between { column, low, high } => table
                .cell(row, *column)
                .is_some_and(|cell| low <= cell && cell <= high),
            Self::IsNull { column } => table.cell(row, *column).is_none(),
            Self::IsNotNull { column } => table.cell(row, *column).is_some(),
            Self::And { conditions } => conditions.iter().all(|c| c.matches(table, row)),
            Self::Or { conditions } => conditions.iter().any(|c| c.matches(table, row)),
        }
    }
}

/// Logical rows matching `condition`, ascending.
#[must_use]
pub fn select<E: Ord>(table: &Table<E>, condition: &Condition<E>) -> Vec<usize> {
    (0..table.row_count())
        .filter(|&row| condition.matches(table, row))
        .collect()
}

/// Answers `condition` from a column index without scanning the table.
///
/// `index` must have been built with [`Table::index_column`] for
/// `indexed_column` and still reflect the table. Returns matching rows
/// ascending, or `None` when the condition cannot be served by this index
/// (other column, `Neq`, `And`, `Or`).
#[must_use]
pub fn select_indexed<E: Ord + Clone>(
    index: &SortedIndex<Option<E>>,
    indexed_column: usize,
    condition: &Condition<E>,
) -> Option<Vec<usize>> {
    if condition.column() != Some(indexed_column) {
        return None;
    }

    let mut rows = match condition {
        Condition::Eq { value, .. } => index.indexes_of(&Some(value.clone())),
        Condition::Gt { value, .. } => {
            index.indexes_of_elements_greater_than(&Some(value.clone()))
        }
        Condition::Lt { value, .. } => {
            // Nulls sort first; skip them.
            let nulls = index.indexes_of(&None).len();
            index
                .indexes_of_elements_less_than(&Some(value.clone()))
                .split_off(nulls)
        }
        Condition::Between { low, high, .. } => index
            .indexes_of_elements_equal_or_between(&Some(low.clone()), &Some(high.clone()))
            .unwrap_or_default(),
        Condition::IsNull { .. } => index.indexes_of(&None),
        Condition::IsNotNull { .. } => index.indexes_of_elements_greater_than(&None),
        Condition::Neq { .. } | Condition::And { .. } | Condition::Or { .. } => return None,
    };
    rows.sort_unstable();
    Some(rows)
}

/// Inner equi-join of two tables on one column each.
///
/// Returns `(left_row, right_row)` pairs in left-then-right row order. Null
/// cells never join.
#[must_use]
pub fn join<E: PartialEq>(
    left: &Table<E>,
    right: &Table<E>,
    left_column: usize,
    right_column: usize,
) -> Vec<(usize, usize)> {
    if left_column >= left.column_count() || right_column >= right.column_count() {
        warn!(
            left_column,
            right_column, "join column outside table; no rows joined"
        );
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for left_row in 0..left.row_count() {
        let Some(key) = left.cell(left_row, left_column) else {
            continue;
        };
        for right_row in 0..right.row_count() {
            if right.cell(right_row, right_column) == Some(key) {
                pairs.push((left_row, right_row));
            }
        }
    }
    pairs
}
