//! JSON serializer for transaction records.
//!
//! Records become an array of objects keyed by the CSV column names. Amounts
//! are JSON numbers carrying the decimal's exact digits.

use crate::types::TransactionRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    account_id: Option<&'a str>,
    statement_number: Option<&'a str>,
    date: NaiveDate,
    entry_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    amount: Decimal,
    dc_mark: Option<&'a str>,
    transaction_type: Option<&'a str>,
    customer_reference: Option<&'a str>,
    bank_reference: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> From<&'a TransactionRecord> for JsonRecord<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        Self {
            account_id: record.account_id.as_deref(),
            statement_number: record.statement_number.as_deref(),
            date: record.date,
            entry_date: record.entry_date,
            amount: record.amount,
            dc_mark: record.dc_mark.as_deref(),
            transaction_type: record.transaction_type.as_deref(),
            customer_reference: record.customer_reference.as_deref(),
            bank_reference: record.bank_reference.as_deref(),
            description: record.description.as_deref(),
        }
    }
}

/// Write records as a JSON array to any destination implementing `Write`.
pub fn write_to<W: Write>(
    mut writer: W,
    records: &[TransactionRecord],
) -> std::result::Result<(), serde_json::Error> {
    let rows = records.iter().map(JsonRecord::from).collect::<Vec<_>>();
    serde_json::to_writer(&mut writer, &rows)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn record(amount: Decimal, mark: &str) -> TransactionRecord {
        TransactionRecord {
            account_id: Some("ACC".into()),
            statement_number: Some("1".into()),
            date: NaiveDate::from_ymd_opt(2025, 2, 18).unwrap(),
            entry_date: None,
            amount,
            dc_mark: Some(mark.into()),
            transaction_type: Some("NTRF".into()),
            customer_reference: None,
            bank_reference: Some("B1".into()),
            description: Some("Payment ref 123".into()),
        }
    }

    #[test]
    fn test_array_of_objects() {
        let mut with_entry = record(Decimal::new(5000, 2), "C");
        with_entry.entry_date = NaiveDate::from_ymd_opt(2025, 2, 19);
        let records = vec![record(Decimal::new(-10000, 2), "D"), with_entry];

        let mut out = Vec::new();
        write_to(&mut out, &records).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        let keys = rows[0].as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        let mut expected = TransactionRecord::FIELDS.map(String::from).to_vec();
        expected.sort();
        let mut keys_sorted = keys;
        keys_sorted.sort();
        assert_eq!(keys_sorted, expected);

        assert_eq!(rows[0]["date"], "2025-02-18");
        assert!(rows[0]["entry_date"].is_null());
        assert!(rows[0]["customer_reference"].is_null());
        assert_eq!(rows[0]["amount"].as_f64(), Some(-100.0));
        assert_eq!(rows[1]["entry_date"], "2025-02-19");
        assert_eq!(rows[1]["amount"].as_f64(), Some(50.0));
    }

    #[test]
    fn test_amount_keeps_exact_digits() {
        let mut out = Vec::new();
        write_to(&mut out, &[record(Decimal::new(-10000, 2), "D")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"amount\":-100.00"), "{text}");
    }

    #[test]
    fn test_empty_array() {
        let mut out = Vec::new();
        write_to(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }
}
