//! Error types for cti3

use std::fmt;

use thiserror::Error;

/// Result type for cti3 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which label sequence of a table a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row labels (sample identifiers)
    Row,
    /// Column labels (field names)
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Errors that can occur while reading, writing or addressing CTI3 data
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The underlying character source or sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table constructor preconditions were violated
    #[error("Invalid table shape: {0}")]
    InvalidShape(String),

    /// A row or column label was not found
    #[error("Unknown {axis} label: {label:?}")]
    UnknownLabel { axis: Axis, label: String },

    /// Index-based access outside the table bounds
    #[error("Index ({row}, {column}) out of range for {rows}x{columns} table")]
    OutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Appended or parsed values disagree with the declared width
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A data block was opened before any data format was declared
    #[error("BEGIN_DATA on line {line} before any BEGIN_DATA_FORMAT")]
    MissingFormat { line: usize },

    /// The source ended inside a block
    #[error("Input ended inside {block} block")]
    Truncated { block: &'static str },

    /// The source ended without a data block
    #[error("No BEGIN_DATA block found")]
    MissingData,
}

impl Error {
    /// Create an `UnknownLabel` error for a row label
    pub(crate) fn unknown_row(label: &str) -> Self {
        Self::UnknownLabel {
            axis: Axis::Row,
            label: label.to_string(),
        }
    }

    /// Create an `UnknownLabel` error for a column label
    pub(crate) fn unknown_column(label: &str) -> Self {
        Self::UnknownLabel {
            axis: Axis::Column,
            label: label.to_string(),
        }
    }
}
