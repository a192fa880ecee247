//! CSV serializer for transaction records.
//!
//! The header row carries the [`TransactionRecord::FIELDS`] names; dates are
//! written as ISO-8601 and amounts in plain decimal notation.

use crate::error::Result;
use crate::types::TransactionRecord;
use csv::{Reader, Writer};
use std::io::{Read, Write};

/// Write records as CSV to any destination implementing `Write`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fin_export::{csv_format, TransactionRecord};
/// use rust_decimal::Decimal;
///
/// let record = TransactionRecord {
///     account_id: Some("NL81ASNB9999999999".into()),
///     statement_number: Some("49".into()),
///     date: NaiveDate::from_ymd_opt(2025, 2, 18).unwrap(),
///     entry_date: None,
///     amount: Decimal::new(-1201, 2),
///     dc_mark: Some("D".into()),
///     transaction_type: Some("NTRF".into()),
///     customer_reference: None,
///     bank_reference: None,
///     description: Some("Groceries".into()),
/// };
///
/// let mut out = Vec::new();
/// csv_format::write_to(&mut out, &[record])?;
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.ends_with("NL81ASNB9999999999,49,2025-02-18,,-12.01,D,NTRF,,,Groceries\n"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_to<W: Write>(writer: W, records: &[TransactionRecord]) -> std::result::Result<(), csv::Error> {
    let mut csv_writer = Writer::from_writer(writer);

    // serde only emits a header with the first record
    if records.is_empty() {
        csv_writer.write_record(TransactionRecord::FIELDS)?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read records back from CSV produced by [`write_to`].
pub fn read_from<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: TransactionRecord = result?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord {
                account_id: Some("NL81ASNB9999999999".into()),
                statement_number: Some("49".into()),
                date: NaiveDate::from_ymd_opt(2025, 2, 18).unwrap(),
                entry_date: Some(NaiveDate::from_ymd_opt(2025, 2, 19).unwrap()),
                amount: Decimal::new(-10000, 2),
                dc_mark: Some("D".into()),
                transaction_type: Some("NTRF".into()),
                customer_reference: Some("GSLNVSHSUTKWDR".into()),
                bank_reference: Some("GI2504900007841".into()),
                description: Some("Rent, February \"flat 2\"".into()),
            },
            TransactionRecord {
                account_id: None,
                statement_number: None,
                date: NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
                entry_date: None,
                amount: Decimal::new(123456789, 8),
                dc_mark: Some("C".into()),
                transaction_type: None,
                customer_reference: None,
                bank_reference: None,
                description: None,
            },
        ]
    }

    #[test]
    fn test_header_and_plain_decimals() {
        let mut out = Vec::new();
        write_to(&mut out, &records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("account_id,statement_number,date,entry_date,amount,dc_mark,transaction_type,customer_reference,bank_reference,description")
        );
        assert_eq!(
            lines.next(),
            Some("NL81ASNB9999999999,49,2025-02-18,2025-02-19,-100.00,D,NTRF,GSLNVSHSUTKWDR,GI2504900007841,\"Rent, February \"\"flat 2\"\"\"")
        );
        assert_eq!(lines.next(), Some(",,2025-02-20,,1.23456789,C,,,,"));
    }

    #[test]
    fn test_empty_set_still_has_header() {
        let mut out = Vec::new();
        write_to(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "account_id,statement_number,date,entry_date,amount,dc_mark,transaction_type,customer_reference,bank_reference,description\n"
        );
    }

    #[test]
    fn test_read_back_matches_written() {
        let mut out = Vec::new();
        write_to(&mut out, &records()).unwrap();

        let read = read_from(out.as_slice()).unwrap();
        assert_eq!(read, records());
    }
}
