//! Coercion of raw records into typed, sign-corrected transaction records.

use crate::error::{Error, Result};
use crate::types::{RawRecord, TransactionRecord};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalize raw records, preserving their order.
///
/// The posting date and the amount are mandatory: the first record failing
/// to coerce either aborts the whole batch with [`Error::MalformedDate`] or
/// [`Error::MalformedAmount`]. The entry date is advisory and becomes `None`
/// when it is missing or unparseable.
pub fn normalize(records: Vec<RawRecord>) -> Result<Vec<TransactionRecord>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

fn normalize_record(index: usize, record: RawRecord) -> Result<TransactionRecord> {
    let date = record
        .date
        .as_deref()
        .and_then(parse_posting_date)
        .ok_or_else(|| Error::MalformedDate {
            record: index,
            value: record.date.clone(),
        })?;

    let entry_date = record
        .entry_date
        .as_deref()
        .and_then(|raw| parse_entry_date(raw, date));

    let magnitude = record
        .amount
        .as_deref()
        .and_then(parse_amount)
        .ok_or_else(|| Error::MalformedAmount {
            record: index,
            value: record.amount.clone(),
        })?;
    let amount = normalize_amount(magnitude, record.dc_mark.as_deref());

    Ok(TransactionRecord {
        account_id: record.account_id,
        statement_number: record.statement_number,
        date,
        entry_date,
        amount,
        dc_mark: record.dc_mark,
        transaction_type: record.transaction_type,
        customer_reference: record.customer_reference,
        bank_reference: record.bank_reference,
        description: record.description,
    })
}

/// Sign a magnitude by its debit/credit marker.
///
/// `D` yields a non-positive amount; any other marker, or none at all, a
/// non-negative one. The sign of `magnitude` itself is ignored.
///
/// ```
/// use fin_export::normalize::normalize_amount;
/// use rust_decimal::Decimal;
///
/// let amount = Decimal::new(10000, 2);
/// assert_eq!(normalize_amount(amount, Some("D")).to_string(), "-100.00");
/// assert_eq!(normalize_amount(amount, Some("C")).to_string(), "100.00");
/// assert_eq!(normalize_amount(amount, None).to_string(), "100.00");
/// ```
pub fn normalize_amount(magnitude: Decimal, marker: Option<&str>) -> Decimal {
    match marker.map(str::trim) {
        Some("D") => -magnitude.abs(),
        _ => magnitude.abs(),
    }
}

/// Parse an amount with either a comma or a dot as decimal separator.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', ".");
    // "250," is a complete MT940 amount
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Parse a posting date: MT940 `YYMMDD` or ISO `YYYY-MM-DD`.
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    parse_mt940_date(raw).or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Parse an entry date: MT940 `MMDD` relative to the posting date, or ISO
/// `YYYY-MM-DD`.
///
/// The entry date takes the posting date's year, except across a year end:
/// a January entry for a December posting belongs to the next year, and a
/// December entry for a January posting to the previous one.
pub fn parse_entry_date(raw: &str, posting: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 4 {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }

    let month = parse_digits(raw.get(0..2)?)?;
    let day = parse_digits(raw.get(2..4)?)?;

    let year = match (posting.month(), month) {
        (12, 1) => posting.year() + 1,
        (1, 12) => posting.year() - 1,
        _ => posting.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse MT940 date format (YYMMDD) to NaiveDate.
pub(crate) fn parse_mt940_date(date_str: &str) -> Option<NaiveDate> {
    if date_str.len() != 6 {
        return None;
    }

    let year = parse_digits(date_str.get(0..2)?)? as i32;
    let month = parse_digits(date_str.get(2..4)?)?;
    let day = parse_digits(date_str.get(4..6)?)?;

    // Assume 2000+ for years < 50, otherwise 1900+
    let full_year = if year < 50 { 2000 + year } else { 1900 + year };

    NaiveDate::from_ymd_opt(full_year, month, day)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
