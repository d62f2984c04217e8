//! # `GridTable` Core
//!
//! In-memory indexed table engine written in Rust.
//!
//! `GridTable` stores a two-dimensional table of a single element type behind
//! stable logical row/column indices, and answers range queries over a column
//! through a sorted secondary index.
//!
//! ## Features
//!
//! - **Stable logical indices**: insert or remove rows/columns anywhere; only
//!   the indirection arrays move, never the cell data of untouched rows
//! - **Bounded memory**: geometric growth, compaction once occupancy drops
//!   under a quarter of capacity
//! - **Tolerant access**: out-of-range reads return `None`, out-of-range
//!   writes grow the table
//! - **Sorted secondary index**: `>`, `<` and inclusive range lookups by
//!   binary search, duplicates and nulls supported
//! - **Coarse locking**: one table-wide read/write lock for shared use
//!
//! ## Quick Start
//!
//! ```rust
//! use gridtable_core::{select, Condition, Table};
//!
//! let mut table = Table::with_headers(["name", "age"])?;
//! table.push_row(["ada".to_string(), "36".to_string()])?;
//! table.push_row(["alan".to_string(), "41".to_string()])?;
//! table.insert_row(0, ["grace".to_string(), "85".to_string()])?;
//!
//! let age = table.require_column("age")?;
//! let index = table.index_column(age)?;
//! let older = select::select_indexed(&index, age, &Condition::gt(age, "40".to_string()));
//! assert_eq!(older, Some(vec![0, 2]));
//! # Ok::<(), gridtable_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Physical slots are stored in 32-bit roaring bitmaps.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod error;
pub mod matrix;
pub mod select;
pub mod shared;
pub mod sorted_index;
#[cfg(test)]
mod sorted_index_tests;
pub mod table;

pub use config::{ConfigError, GridConfig, LoggingConfig, StorageConfig};
pub use error::{Error, Result};
pub use matrix::{MatrixStore, DEFAULT_INITIAL_CAPACITY, MAX_AXIS_SLOTS};
pub use select::Condition;
pub use shared::SharedTable;
pub use sorted_index::SortedIndex;
pub use table::{ColumnRef, RowRef, Table};
