//! Error types for the fin_export library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading statements and exporting records.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file does not exist.
    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    /// The MT940 payload is structurally malformed.
    #[error("MT940 parsing error at line {line}: {message}")]
    StatementParse { line: usize, message: String },

    /// A record's mandatory posting date is missing or unparseable.
    #[error("Invalid posting date in record {record}: {value:?}")]
    MalformedDate { record: usize, value: Option<String> },

    /// A record's amount is missing or not numeric.
    #[error("Invalid amount in record {record}: {value:?}")]
    MalformedAmount { record: usize, value: Option<String> },

    /// None of the inputs produced any transaction.
    #[error("No valid data parsed from {inputs} input file(s)")]
    NoData { inputs: usize },

    /// The destination could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    /// I/O error occurred during read operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading CSV data.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid format specified.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Whether the error only invalidates the file being loaded, leaving the
    /// rest of the batch usable.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Error::InputNotFound(_)
                | Error::StatementParse { .. }
                | Error::MalformedDate { .. }
                | Error::MalformedAmount { .. }
                | Error::Io(_)
        )
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::StatementParse {
            line,
            message: message.into(),
        }
    }
}

/// Underlying cause of an [`Error::ExportWrite`].
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),
}
