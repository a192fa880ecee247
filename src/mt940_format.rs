//! MT940 SWIFT format reader.
//!
//! MT940 is a SWIFT format for electronic account statements. This module
//! turns a raw `.fin` payload into [`Statement`]s. Only the message structure
//! is checked here: field values such as dates and amounts are handed on as
//! raw text and coerced later by [`crate::normalize`].

use crate::error::{Error, Result};
use crate::normalize::parse_mt940_date;
use crate::types::{Balance, DebitCredit, Statement, Transaction};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// A tagged field of the message text block, with its continuation lines.
#[derive(Debug)]
struct Field {
    tag: String,
    value: String,
    line: usize,
}

/// Parse every statement contained in an MT940 payload.
///
/// A payload may hold several SWIFT messages, and each message may hold
/// several statements; they are returned in file order.
///
/// # Examples
///
/// ```
/// use fin_export::mt940_format;
///
/// let raw = b":20:REF1\n:25:NL01BANK0123456789\n:28C:1/1\n:61:2502180218D12,01NTRFNONREF//B1\n:86:Groceries\n";
/// let statements = mt940_format::parse(raw)?;
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].transactions[0].amount.as_deref(), Some("12,01"));
/// # Ok::<(), fin_export::Error>(())
/// ```
pub fn parse(raw: &[u8]) -> Result<Vec<Statement>> {
    let text = String::from_utf8_lossy(raw);
    let (fields, lines) = split_fields(&text)?;

    let mut statements = Vec::new();
    let mut current: Option<Statement> = None;
    let mut previous_tag = String::new();

    for field in fields {
        trace!(tag = %field.tag, line = field.line, "MT940 field");

        if field.tag == "20" {
            // Transaction Reference Number opens a new statement
            if let Some(statement) = current.take() {
                statements.push(statement);
            }
            current = Some(Statement::new(field.value.trim()));
        } else {
            let statement = current.as_mut().ok_or_else(|| {
                Error::parse(
                    field.line,
                    format!("Field :{}: before statement reference :20:", field.tag),
                )
            })?;
            apply_field(statement, &field, &previous_tag)?;
        }

        previous_tag = field.tag;
    }

    if let Some(statement) = current.take() {
        statements.push(statement);
    }

    if statements.is_empty() {
        return Err(Error::parse(lines, "No MT940 statements found"));
    }

    debug!(statements = statements.len(), "Parsed MT940 payload");
    Ok(statements)
}

/// Parse every statement from any source implementing `Read`.
pub fn from_read<R: Read>(reader: &mut R) -> Result<Vec<Statement>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    parse(&raw)
}

/// Read and parse a `.fin` file.
///
/// A path that does not name an existing file yields
/// [`Error::InputNotFound`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Statement>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read(path)?;
    parse(&raw)
}

/// Strip the SWIFT envelope and group the text block into tagged fields.
///
/// Returns the fields and the number of lines scanned.
fn split_fields(text: &str) -> Result<(Vec<Field>, usize)> {
    let mut fields: Vec<Field> = Vec::new();
    let mut in_field = false;
    let mut lines = 0;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        lines = line_no;

        // Basic and application headers precede the text block on the same line
        let line = if line.trim_start().starts_with('{') {
            line.find("{4:").map_or(line, |pos| &line[pos + 3..])
        } else {
            line
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("-}") || trimmed == "-" {
            // End of text block, or of a bare message without envelope
            in_field = false;
            continue;
        }
        if trimmed.starts_with('{') {
            // Header or trailer blocks outside the text block
            in_field = false;
            continue;
        }

        if let Some((tag, value)) = split_tag(trimmed) {
            fields.push(Field {
                tag: tag.to_string(),
                value: value.to_string(),
                line: line_no,
            });
            in_field = true;
        } else if in_field {
            if let Some(field) = fields.last_mut() {
                field.value.push('\n');
                field.value.push_str(line.trim_end());
            }
        } else {
            return Err(Error::parse(line_no, format!("Unexpected content: {}", trimmed)));
        }
    }

    Ok((fields, lines))
}

/// Split `:TAG:value` into its tag and value.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(':')?;
    let end = rest.find(':')?;
    let tag = &rest[..end];

    let well_formed = (2..=3).contains(&tag.len())
        && tag.starts_with(|c: char| c.is_ascii_digit())
        && tag.chars().all(|c| c.is_ascii_alphanumeric());

    if well_formed {
        Some((tag, &rest[end + 1..]))
    } else {
        None
    }
}

fn apply_field(statement: &mut Statement, field: &Field, previous_tag: &str) -> Result<()> {
    let value = field.value.as_str();

    match field.tag.as_str() {
        "25" => {
            // Account Identification
            statement.account_id = non_empty(value.trim());
        }
        "28" | "28C" => {
            // Statement Number/Sequence Number
            let mut parts = value.trim().splitn(2, '/');
            statement.statement_number = parts.next().and_then(non_empty);
            statement.sequence_number = parts.next().and_then(non_empty);
        }
        "60F" | "60M" => {
            statement.opening_balance = Some(parse_balance(value, field.line)?);
        }
        "61" => {
            // Statement Line; a second line holds supplementary details
            let first_line = value.lines().next().unwrap_or("");
            statement.add_transaction(parse_statement_line(first_line, field.line)?);
        }
        "86" if previous_tag == "61" => {
            // Information to Account Owner for the preceding statement line
            if let Some(transaction) = statement.transactions.last_mut() {
                let description = value
                    .lines()
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                transaction.description = non_empty(&description);
            }
        }
        "62F" | "62M" => {
            statement.closing_balance = Some(parse_balance(value, field.line)?);
        }
        other => {
            trace!(tag = other, line = field.line, "Ignoring MT940 field");
        }
    }

    Ok(())
}

fn parse_balance(value: &str, line: usize) -> Result<Balance> {
    // Format: C250218USD2732398848,02
    // Position 1: D/C indicator
    // Position 2-7: Date (YYMMDD)
    // Position 8-10: Currency
    // Position 11+: Amount
    let content = value.trim();

    if content.len() < 11 {
        return Err(Error::parse(line, format!("Balance line too short: {}", content)));
    }

    let debit_credit = content
        .get(0..1)
        .unwrap_or("")
        .parse::<DebitCredit>()
        .map_err(|_| Error::parse(line, format!("Invalid D/C indicator in: {}", content)))?;

    let date = content
        .get(1..7)
        .and_then(parse_mt940_date)
        .ok_or_else(|| Error::parse(line, format!("Invalid date in balance line: {}", content)))?;

    let currency = content
        .get(7..10)
        .ok_or_else(|| Error::parse(line, format!("Invalid currency in balance line: {}", content)))?
        .to_string();

    let amount_str = content
        .get(10..)
        .ok_or_else(|| Error::parse(line, format!("Missing amount in balance line: {}", content)))?
        .replace(',', ".");
    let amount = Decimal::from_str(&amount_str)
        .map_err(|_| Error::parse(line, format!("Invalid balance amount: {}", amount_str)))?;

    Ok(Balance {
        debit_credit,
        date,
        currency,
        amount,
    })
}

fn parse_statement_line(value: &str, line: usize) -> Result<Transaction> {
    // Format: 2502180218D12,01NTRFGSLNVSHSUTKWDR//GI2504900007841
    // Position 1-6: Value date (YYMMDD)
    // Position 7-10: Entry date (MMDD) - optional
    // Then D/C mark (D, C, RD, RC) and an optional funds code
    // Then amount, transaction type code, references
    let content = value.trim();

    let date = content
        .get(0..6)
        .ok_or_else(|| Error::parse(line, format!("Statement line too short: {}", content)))?;
    let mut rest = content
        .get(6..)
        .ok_or_else(|| Error::parse(line, format!("Statement line too short: {}", content)))?;

    let entry_date = if rest.len() >= 4 && rest.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        let entry_date = &rest[..4];
        rest = &rest[4..];
        Some(entry_date.to_string())
    } else {
        None
    };

    let dc_mark = ["RD", "RC", "D", "C"]
        .into_iter()
        .find(|mark| rest.starts_with(mark))
        .ok_or_else(|| Error::parse(line, format!("Missing D/C mark in: {}", content)))?;
    rest = &rest[dc_mark.len()..];

    // Funds code
    rest = rest.strip_prefix(|c: char| c.is_ascii_alphabetic()).unwrap_or(rest);

    let amount_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    if amount_end == 0 {
        return Err(Error::parse(line, format!("Missing amount in: {}", content)));
    }
    let amount = &rest[..amount_end];
    rest = &rest[amount_end..];

    let transaction_type = match rest.get(..4) {
        Some(code) if code.chars().all(|c| c.is_ascii_alphanumeric()) => {
            rest = &rest[4..];
            Some(code.to_string())
        }
        _ => None,
    };

    let (customer_reference, bank_reference) = match rest.split_once("//") {
        Some((customer, bank)) => {
            let bank = bank.split_whitespace().next().unwrap_or("");
            (non_empty(customer.trim()), non_empty(bank))
        }
        None => (non_empty(rest.trim()), None),
    };

    Ok(Transaction {
        date: Some(date.to_string()),
        entry_date,
        amount: Some(amount.to_string()),
        dc_mark: Some(dc_mark.to_string()),
        transaction_type,
        customer_reference,
        bank_reference,
        description: None,
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
