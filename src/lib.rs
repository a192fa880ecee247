//! fin_export Library
//!
//! Turns SWIFT MT940 bank statement files (`.fin`) into flat, normalized
//! transaction tables.
//!
//! # Pipeline
//!
//! - [`mt940_format`]: parses a payload into statements
//! - [`flatten`]: one raw record per transaction, with account and statement context
//! - [`normalize`]: typed dates and signed amounts
//! - [`clean`]: trimmed text fields, exact duplicates removed
//! - [`export`]: CSV, JSON or SQLite destinations
//!
//! [`pipeline`] ties these together for a batch of input files.
//!
//! # Supported Formats
//!
//! - **CSV**: header row plus one row per transaction
//! - **JSON**: an array of objects
//! - **SQLite**: rows appended to the `transactions` table
//!
//! # Examples
//!
//! ## Exporting a batch of statement files
//!
//! ```no_run
//! use fin_export::{pipeline, ExportRequest, Format};
//!
//! let request = ExportRequest::new(["january.fin", "february.fin"])
//!     .with_format(Format::Json)
//!     .with_destination("out");
//! let summary = pipeline::run(&request)?;
//! println!("Wrote {}", summary.artifact.path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Using the stages directly
//!
//! ```no_run
//! use fin_export::{clean::clean, flatten::flatten, mt940_format, normalize::normalize};
//!
//! let statements = mt940_format::parse_file("statement.fin")?;
//! let records = clean(normalize(flatten(&statements))?);
//! println!("{} transactions", records.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod mt940_format;
pub mod flatten;
pub mod normalize;
pub mod clean;
pub mod csv_format;
pub mod json_format;
pub mod sqlite_format;
pub mod export;
pub mod pipeline;

use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use error::{Error, Result, WriteError};
pub use export::WrittenArtifact;
pub use pipeline::{ExportRequest, ExportSummary, FileFailure};
pub use types::{Balance, DebitCredit, RawRecord, Statement, Transaction, TransactionRecord};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Comma-separated values
    #[default]
    Csv,
    /// JSON array of objects
    Json,
    /// SQLite database
    Sqlite,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "sqlite" => Ok(Format::Sqlite),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Format {
    /// Lowercase name of this format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Sqlite => "sqlite",
        }
    }

    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Sqlite => "db",
        }
    }

    /// File name used when the destination is a directory.
    pub fn default_file_name(&self) -> String {
        format!("transactions.{}", self.extension())
    }
}
