use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::table::ColumnKind;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed table {origin}: {source}")]
    Parse { origin: String, source: csv::Error },

    #[error("table {origin} has no header row")]
    Empty { origin: String },

    #[error("table {origin} is missing column `{column}`")]
    MissingColumn { origin: String, column: String },

    #[error("column `{column}` in {origin} is {found:?}, expected {expected:?}")]
    ColumnType {
        origin: String,
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Raised when a column does not line up with the table it is added to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("column `{column}` has {found} rows, table has {expected}")]
    RowCount {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column `{column}`")]
    Duplicate { column: String },
}

/// A selection that references something the live schema cannot serve.
/// The dashboard treats every variant as "nothing selected".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown column `{column}`")]
    UnknownColumn { column: String },

    #[error("column `{column}` is not numerical")]
    NotNumerical { column: String },

    #[error("column `{column}` is not an allowed categorical column")]
    NotCategorical { column: String },

    #[error("`{column}` cannot be used as a trend metric")]
    ExcludedMetric { column: String },

    #[error("unsupported trend grouping `{column}`")]
    UnsupportedGrouping { column: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum FitError {
    #[error("x has zero variance, least-squares fit is undefined")]
    ZeroVariance,

    #[error("at least two points are needed for a fit")]
    TooFewPoints,
}
