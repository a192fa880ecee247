//! Writing a record set to its destination.

use crate::error::{Error, Result, WriteError};
use crate::types::TransactionRecord;
use crate::{csv_format, json_format, sqlite_format, Format};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Describes what an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// Format of the artifact.
    pub format: Format,

    /// File (or SQLite database) that was written.
    pub path: PathBuf,

    /// Number of records written.
    pub records: usize,
}

/// Resolve the file an export to `destination` writes.
///
/// A directory gets the format's default file name appended; any other path
/// is used verbatim.
pub fn resolve_destination(destination: &Path, format: Format) -> PathBuf {
    if destination.is_dir() {
        destination.join(format.default_file_name())
    } else {
        destination.to_path_buf()
    }
}

/// Export records to `destination` in the given format.
///
/// CSV and JSON are written to a temporary file next to the target and
/// renamed into place, so a failed export leaves any previous file intact.
/// SQLite rows are appended in a single transaction.
pub fn export(records: &[TransactionRecord], format: Format, destination: &Path) -> Result<WrittenArtifact> {
    let path = resolve_destination(destination, format);

    let written = match format {
        Format::Csv => write_atomically(&path, |file| {
            csv_format::write_to(file, records).map_err(WriteError::from)
        }),
        Format::Json => write_atomically(&path, |file| {
            json_format::write_to(BufWriter::new(file), records).map_err(WriteError::from)
        }),
        Format::Sqlite => sqlite_format::append(&path, records).map(|_| ()),
    };

    if let Err(source) = written {
        return Err(Error::ExportWrite { path, source });
    }

    info!(
        format = format.name(),
        path = %path.display(),
        records = records.len(),
        "Export written"
    );

    Ok(WrittenArtifact {
        format,
        path,
        records: records.len(),
    })
}

fn write_atomically<F>(path: &Path, write: F) -> std::result::Result<(), WriteError>
where
    F: FnOnce(&mut File) -> std::result::Result<(), WriteError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::tempdir;

    fn records() -> Vec<TransactionRecord> {
        vec![TransactionRecord {
            account_id: Some("ACC".into()),
            statement_number: Some("1".into()),
            date: NaiveDate::from_ymd_opt(2025, 2, 18).unwrap(),
            entry_date: None,
            amount: Decimal::new(-10000, 2),
            dc_mark: Some("D".into()),
            transaction_type: None,
            customer_reference: None,
            bank_reference: None,
            description: Some("Payment ref 123".into()),
        }]
    }

    #[test]
    fn test_resolve_destination() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_destination(dir.path(), Format::Csv),
            dir.path().join("transactions.csv")
        );
        assert_eq!(
            resolve_destination(dir.path(), Format::Json),
            dir.path().join("transactions.json")
        );
        assert_eq!(
            resolve_destination(dir.path(), Format::Sqlite),
            dir.path().join("transactions.db")
        );

        let file = dir.path().join("out.txt");
        assert_eq!(resolve_destination(&file, Format::Json), file);
    }

    #[test]
    fn test_export_csv_into_directory() {
        let dir = tempdir().unwrap();
        let artifact = export(&records(), Format::Csv, dir.path()).unwrap();

        assert_eq!(artifact.path, dir.path().join("transactions.csv"));
        assert_eq!(artifact.records, 1);

        let read = csv_format::read_from(File::open(&artifact.path).unwrap()).unwrap();
        assert_eq!(read, records());
    }

    #[test]
    fn test_export_json_to_file_replaces_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale").unwrap();

        export(&records(), Format::Json, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("Payment ref 123"));
        // No stray temporary files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_sqlite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let artifact = export(&records(), Format::Sqlite, &path).unwrap();
        assert_eq!(artifact.path, path);
        assert!(path.is_file());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = export(&records(), Format::Csv, &path).unwrap_err();
        assert!(matches!(err, Error::ExportWrite { .. }));
        assert!(!path.exists());
    }
}
