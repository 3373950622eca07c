use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// LoadError – the whole source could not be turned into a record set
// ---------------------------------------------------------------------------

/// Fatal loader failures. A `LoadError` never comes with a partial dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("spreadsheet error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workbook has no sheet named '{0}'")]
    NoSheet(String),

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("source is not tabular: {0}")]
    NotTabular(String),
}

// ---------------------------------------------------------------------------
// ParseError – one row was rejected
// ---------------------------------------------------------------------------

/// Why a single row could not become a transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing value for '{column}'")]
    MissingField { column: String },

    #[error("cannot parse date '{value}'")]
    InvalidDate { value: String },

    #[error("cannot parse amount '{value}'")]
    InvalidAmount { value: String },

    #[error("amount '{value}' pushes the dataset total past the decimal range")]
    AmountOutOfRange { value: String },
}

/// A rejected row, kept so the UI can report how much was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: ParseError,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}
