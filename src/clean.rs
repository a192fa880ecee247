//! Whitespace trimming and exact-duplicate removal.

use crate::types::TransactionRecord;
use std::collections::HashSet;

/// Trim every text field, then drop records identical to an earlier one.
///
/// The first occurrence of a record is kept and the relative order of the
/// survivors is unchanged. Records that differ in any field, including only
/// the statement number, are distinct. Cleaning a cleaned set is a no-op.
pub fn clean(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let mut seen = HashSet::with_capacity(records.len());

    records
        .into_iter()
        .map(trim_record)
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

fn trim_record(mut record: TransactionRecord) -> TransactionRecord {
    for field in [
        &mut record.account_id,
        &mut record.statement_number,
        &mut record.dc_mark,
        &mut record.transaction_type,
        &mut record.customer_reference,
        &mut record.bank_reference,
        &mut record.description,
    ] {
        trim_in_place(field);
    }
    record
}

fn trim_in_place(field: &mut Option<String>) {
    if let Some(value) = field {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn record(statement: &str, description: &str) -> TransactionRecord {
        TransactionRecord {
            account_id: Some("ACC".into()),
            statement_number: Some(statement.into()),
            date: NaiveDate::from_ymd_opt(2025, 2, 18).unwrap(),
            entry_date: None,
            amount: Decimal::new(-10000, 2),
            dc_mark: Some("D".into()),
            transaction_type: Some("NTRF".into()),
            customer_reference: None,
            bank_reference: None,
            description: Some(description.into()),
        }
    }

    #[test]
    fn test_trims_text_fields() {
        let mut dirty = record("1", "  Payment ref 123  ");
        dirty.account_id = Some(" ACC\t".into());
        dirty.dc_mark = Some("D ".into());

        let cleaned = clean(vec![dirty]);
        assert_eq!(cleaned[0].description.as_deref(), Some("Payment ref 123"));
        assert_eq!(cleaned[0].account_id.as_deref(), Some("ACC"));
        assert_eq!(cleaned[0].dc_mark.as_deref(), Some("D"));
        assert_eq!(cleaned[0].customer_reference, None);
    }

    #[test]
    fn test_drops_later_duplicates() {
        let records = vec![
            record("1", "a"),
            record("1", "b"),
            record("1", "a"),
            record("2", "a"),
            record("1", "b"),
        ];

        let cleaned = clean(records);
        assert_eq!(
            cleaned,
            vec![record("1", "a"), record("1", "b"), record("2", "a")]
        );
    }

    #[test]
    fn test_duplicates_after_trimming_collapse() {
        let cleaned = clean(vec![record("1", "a "), record("1", " a")]);
        assert_eq!(cleaned, vec![record("1", "a")]);
    }

    #[test]
    fn test_different_amounts_are_distinct() {
        let mut other = record("1", "a");
        other.amount = Decimal::new(-10001, 2);
        let cleaned = clean(vec![record("1", "a"), other]);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("1", " a"),
            record("1", "a "),
            record("2", "\tb"),
            record("2", "b"),
            record("3", "c"),
        ];

        let once = clean(records);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
    }
}
