// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or combining tables
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A sequence claimed to be sorted is not; `position` is the first
    /// element that compares lower than its predecessor
    #[error("Input is not sorted at position {position}")]
    Unsorted { position: usize },

    /// A row is too short for the requested column
    #[error("Row {row} has {width} columns, column {column} requested")]
    MissingColumn {
        row: usize,
        width: usize,
        column: usize,
    },

    /// A field is not a finite number
    #[error("Invalid numeric field '{field}'")]
    Parse { field: String },
}

impl Error {
    pub fn unsorted(position: usize) -> Self {
        Error::Unsorted { position }
    }

    pub fn missing_column(row: usize, width: usize, column: usize) -> Self {
        Error::MissingColumn { row, width, column }
    }

    pub fn parse<S: AsRef<str>>(field: S) -> Self {
        Error::Parse {
            field: field.as_ref().to_string(),
        }
    }
}
