//! Batch processing of statement files: load, combine, clean, export.
//!
//! Errors that only concern one input file ([`Error::is_file_scoped`]) are
//! logged and recorded in the [`ExportSummary`]; the remaining files are
//! still exported. Run-wide errors abort the batch.

use crate::clean::clean;
use crate::error::{Error, Result};
use crate::export::{export, WrittenArtifact};
use crate::flatten::flatten;
use crate::mt940_format;
use crate::normalize::normalize;
use crate::types::TransactionRecord;
use crate::Format;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// What to export, and where.
///
/// Built once by the caller and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    inputs: Vec<PathBuf>,
    format: Format,
    destination: PathBuf,
}

impl ExportRequest {
    /// Create a CSV request writing into the current directory.
    pub fn new<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            format: Format::Csv,
            destination: PathBuf::from("."),
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the output file or directory.
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// An input file that contributed nothing, and why.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct ExportSummary {
    /// The written artifact.
    pub artifact: WrittenArtifact,

    /// Input files that were skipped.
    pub failures: Vec<FileFailure>,
}

/// Parse, flatten and normalize one statement file.
pub fn load_file(path: &Path) -> Result<Vec<TransactionRecord>> {
    let statements = mt940_format::parse_file(path)?;
    let records = normalize(flatten(&statements))?;
    debug!(
        path = %path.display(),
        statements = statements.len(),
        records = records.len(),
        "Loaded statement file"
    );
    Ok(records)
}

/// Load every input in order and concatenate their records.
///
/// File-scoped failures are logged and returned alongside the records.
pub fn collect(inputs: &[PathBuf]) -> Result<(Vec<TransactionRecord>, Vec<FileFailure>)> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for path in inputs {
        match load_file(path) {
            Ok(loaded) => records.extend(loaded),
            Err(error) if error.is_file_scoped() => {
                warn!("Failed to parse {}: {error}", path.display());
                failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok((records, failures))
}

/// Run the whole pipeline for a request.
///
/// Nothing is written when no input yields a transaction; the run then fails
/// with [`Error::NoData`].
pub fn run(request: &ExportRequest) -> Result<ExportSummary> {
    let (records, failures) = collect(request.inputs())?;
    let loaded = records.len();
    let records = clean(records);
    debug!(loaded, kept = records.len(), "Cleaned record set");

    if records.is_empty() {
        return Err(Error::NoData {
            inputs: request.inputs().len(),
        });
    }

    let artifact = export(&records, request.format(), request.destination())?;
    Ok(ExportSummary { artifact, failures })
}

/// Run the pipeline on a background worker thread.
///
/// Lets an interactive caller stay responsive; join the handle for the
/// result.
pub fn spawn(request: ExportRequest) -> Result<JoinHandle<Result<ExportSummary>>> {
    let handle = thread::Builder::new()
        .name("fin-export".to_string())
        .spawn(move || run(&request))?;
    Ok(handle)
}
