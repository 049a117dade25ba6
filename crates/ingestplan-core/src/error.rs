use thiserror::Error;

use crate::table::TableKey;

/// Canonical result for core and the allocator.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {parameter}: {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    /// `row` is the 1-based position of the record in the inventory.
    #[error("invalid inventory row {row}: {reason}")]
    InvalidInventory { row: usize, reason: String },

    #[error("duplicate table {key} (rows {first_row} and {second_row})")]
    DuplicateTable {
        key: TableKey,
        first_row: usize,
        second_row: usize,
    },

    #[error("hashing error: {0}")]
    Hash(String),
}

impl Error {
    pub fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn inventory(row: usize, reason: impl Into<String>) -> Self {
        Error::InvalidInventory {
            row,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
