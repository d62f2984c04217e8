//! Error types for `GridTable`.
//!
//! The matrix store and sorted index never fail on coordinates: reads out of
//! range yield `None` and writes out of range grow the table. This error type
//! belongs to the facade layer, where callers ask for validated access.

use thiserror::Error;

/// Result type alias for `GridTable` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `GridTable` facade operations.
///
/// Error codes follow the pattern `GRID-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// Row index outside the logical table (GRID-001).
    #[error("[GRID-001] Row index {index} out of bounds for table with {len} rows")]
    RowOutOfBounds {
        /// Requested logical row.
        index: usize,
        /// Current logical row count.
        len: usize,
    },

    /// Column index outside the logical table (GRID-002).
    #[error("[GRID-002] Column index {index} out of bounds for table with {len} columns")]
    ColumnOutOfBounds {
        /// Requested logical column.
        index: usize,
        /// Current logical column count.
        len: usize,
    },

    /// No column carries the requested header (GRID-003).
    #[error("[GRID-003] Column '{0}' not found")]
    ColumnNotFound(String),

    /// The store could not resolve a physical slot for a new row or column (GRID-004).
    ///
    /// Either the axis reached [`MAX_AXIS_SLOTS`](crate::MAX_AXIS_SLOTS) or a
    /// capacity invariant is broken.
    #[error("[GRID-004] No free physical slot for new {0}")]
    SlotUnavailable(&'static str),
}

impl Error {
    /// Returns the error code (e.g., "GRID-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RowOutOfBounds { .. } => "GRID-001",
            Self::ColumnOutOfBounds { .. } => "GRID-002",
            Self::ColumnNotFound(_) => "GRID-003",
            Self::SlotUnavailable(_) => "GRID-004",
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// A missing physical slot means the store's invariants are broken.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SlotUnavailable(_))
    }
}

