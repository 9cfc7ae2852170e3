use std::fmt;

use srvcat_core::UnknownCode;
use thiserror::Error;

/// Failure to interpret a single cell or query value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid {field} format: {input:?}")]
    Format { field: &'static str, input: String },

    #[error(transparent)]
    UnknownCode(#[from] UnknownCode),
}

impl FieldError {
    pub(crate) fn format(field: &'static str, input: &str) -> Self {
        Self::Format {
            field,
            input: input.to_string(),
        }
    }
}

/// Spreadsheet columns, in required header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Model,
    Ram,
    Hdd,
    Location,
    Price,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::Model => "Model",
            Column::Ram => "RAM",
            Column::Hdd => "HDD",
            Column::Location => "Location",
            Column::Price => "Price",
        };
        f.write_str(name)
    }
}

/// Coarse classification of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Validation,
    UnknownCode,
    LimitExceeded,
    Storage,
}

/// Reasons an upload is rejected. Any of these aborts the whole batch.
///
/// Row numbers are spreadsheet row numbers: the header is row 1.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid XLSX file: {0}")]
    Unreadable(String),

    #[error("no sheet found")]
    NoSheet,

    #[error("no data in the sheet")]
    NoData,

    #[error("maximum number of rows exceeded ({max}): found {found}")]
    TooManyRows { max: usize, found: usize },

    #[error("invalid XLSX columns: expected Model, RAM, HDD, Location, Price")]
    HeaderMismatch,

    #[error("row {row} too short: expected 5 cells, found {found}")]
    ShortRow { row: usize, found: usize },

    #[error("{column} is required at row {row}")]
    MissingValue { row: usize, column: Column },

    #[error("invalid {column} at row {row} ({value:?}): {source}")]
    InvalidCell {
        row: usize,
        column: Column,
        value: String,
        #[source]
        source: FieldError,
    },

    #[error("failed to store catalog entries: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IngestError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Unreadable(_)
            | IngestError::NoSheet
            | IngestError::NoData
            | IngestError::HeaderMismatch
            | IngestError::ShortRow { .. }
            | IngestError::InvalidCell {
                source: FieldError::Format { .. },
                ..
            } => ErrorKind::Format,
            IngestError::InvalidCell {
                source: FieldError::UnknownCode(_),
                ..
            } => ErrorKind::UnknownCode,
            IngestError::MissingValue { .. } => ErrorKind::Validation,
            IngestError::TooManyRows { .. } => ErrorKind::LimitExceeded,
            IngestError::Storage(_) => ErrorKind::Storage,
        }
    }
}
