//! Errors raised by grid storage engines.
//!
//! Every variant carries the offending position and the bound it was checked
//! against, so a caller can report exactly which primitive was misused.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row {row} is out of range (row count {row_count})")]
    RowOutOfRange { row: usize, row_count: usize },

    #[error("row insertion position {position} is out of range (row count {row_count})")]
    InsertPositionOutOfRange { position: usize, row_count: usize },

    #[error("column {column} is out of range (column count {column_count})")]
    ColumnOutOfRange { column: usize, column_count: usize },

    #[error("cell slot {slot} is out of range for row {row} ({slots} slots)")]
    SlotOutOfRange { row: usize, slot: usize, slots: usize },

    #[error("column '{name}' was seeded with {provided} values but the grid has {row_count} rows")]
    SeedLengthMismatch {
        name: String,
        provided: usize,
        row_count: usize,
    },
}

pub type GridResult<T> = Result<T, GridError>;
