//! SQLite destination: appends records to the `transactions` table.

use crate::error::WriteError;
use crate::types::TransactionRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;
use tracing::debug;

/// Name of the table records are appended to.
pub const TABLE: &str = "transactions";

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE} (
    account_id TEXT,
    statement_number TEXT,
    date DATETIME NOT NULL,
    entry_date DATETIME,
    amount NUMERIC NOT NULL,
    dc_mark TEXT,
    transaction_type TEXT,
    customer_reference TEXT,
    bank_reference TEXT,
    description TEXT
)"
    )
}

fn insert_sql() -> String {
    format!(
        "INSERT INTO {TABLE} (
    account_id, statement_number, date, entry_date, amount,
    dc_mark, transaction_type, customer_reference, bank_reference, description
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
}

/// Append records to the `transactions` table of the database at `path`,
/// creating the file and the table when missing.
///
/// All rows are inserted in one transaction: either every record is
/// appended or none is. Existing rows are never touched.
pub fn append(path: &Path, records: &[TransactionRecord]) -> Result<u64, WriteError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let appended = runtime.block_on(append_rows(path, records))?;
    Ok(appended)
}

async fn append_rows(path: &Path, records: &[TransactionRecord]) -> Result<u64, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;
    debug!(path = %path.display(), "Opened SQLite database");

    let mut tx = conn.begin().await?;
    sqlx::query(&create_table_sql()).execute(&mut *tx).await?;

    let insert = insert_sql();

    let mut appended = 0;
    for record in records {
        let result = sqlx::query(&insert)
            .bind(record.account_id.as_deref())
            .bind(record.statement_number.as_deref())
            .bind(record.date)
            .bind(record.entry_date)
            // NUMERIC affinity stores the exact text as a number
            .bind(record.amount.to_string())
            .bind(record.dc_mark.as_deref())
            .bind(record.transaction_type.as_deref())
            .bind(record.customer_reference.as_deref())
            .bind(record.bank_reference.as_deref())
            .bind(record.description.as_deref())
            .execute(&mut *tx)
            .await?;
        appended += result.rows_affected();
    }

    tx.commit().await?;
    conn.close().await?;

    debug!(rows = appended, table = TABLE, "Appended rows");
    Ok(appended)
}
