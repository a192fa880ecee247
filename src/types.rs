//! Statement data as delivered by the MT940 source, and the flat records
//! derived from it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Debit/Credit indicator of a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitCredit {
    /// Debit balance.
    Debit,
    /// Credit balance.
    Credit,
}

impl FromStr for DebitCredit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "D" => Ok(DebitCredit::Debit),
            "C" => Ok(DebitCredit::Credit),
            _ => Err(format!("Invalid debit/credit indicator: {}", s)),
        }
    }
}

/// Account statement balance information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Debit/Credit indicator.
    pub debit_credit: DebitCredit,

    /// Date of the balance.
    pub date: NaiveDate,

    /// Currency code.
    pub currency: String,

    /// Balance amount.
    pub amount: Decimal,
}

/// One `:61:`/`:86:` entry of a statement, with field values kept as they
/// appear in the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Value date, `YYMMDD`.
    pub date: Option<String>,

    /// Entry (booking) date, `MMDD`.
    pub entry_date: Option<String>,

    /// Unsigned amount, possibly with a comma decimal separator.
    pub amount: Option<String>,

    /// `D`, `C`, `RD` or `RC`.
    pub dc_mark: Option<String>,

    /// Transaction type identification code, e.g. `NTRF`.
    pub transaction_type: Option<String>,

    /// Reference for the account owner.
    pub customer_reference: Option<String>,

    /// Reference of the account servicing institution.
    pub bank_reference: Option<String>,

    /// Information to account owner (`:86:`).
    pub description: Option<String>,
}

/// One MT940 statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// Transaction reference number (`:20:`).
    pub reference: String,

    /// Account identification (`:25:`).
    pub account_id: Option<String>,

    /// Statement number (`:28C:`, before the slash).
    pub statement_number: Option<String>,

    /// Sequence number (`:28C:`, after the slash).
    pub sequence_number: Option<String>,

    /// Opening balance (`:60F:`/`:60M:`).
    pub opening_balance: Option<Balance>,

    /// Closing balance (`:62F:`/`:62M:`).
    pub closing_balance: Option<Balance>,

    /// List of transactions.
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Create a new statement with basic information.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Default::default()
        }
    }

    /// Add a transaction to the statement.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}

/// A transaction with its statement context attached, not yet normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub account_id: Option<String>,
    pub statement_number: Option<String>,
    pub date: Option<String>,
    pub entry_date: Option<String>,
    pub amount: Option<String>,
    pub dc_mark: Option<String>,
    pub transaction_type: Option<String>,
    pub customer_reference: Option<String>,
    pub bank_reference: Option<String>,
    pub description: Option<String>,
}

/// A normalized, export-ready transaction row.
///
/// Field order is the column order of every export format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Account identification.
    pub account_id: Option<String>,

    /// Statement number.
    pub statement_number: Option<String>,

    /// Posting (value) date.
    pub date: NaiveDate,

    /// Entry date, when present and parseable.
    pub entry_date: Option<NaiveDate>,

    /// Signed amount: negative for debits.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Debit/credit marker as found in the statement.
    pub dc_mark: Option<String>,

    /// Transaction type identification code.
    pub transaction_type: Option<String>,

    /// Reference for the account owner.
    pub customer_reference: Option<String>,

    /// Reference of the account servicing institution.
    pub bank_reference: Option<String>,

    /// Transaction description.
    pub description: Option<String>,
}

impl TransactionRecord {
    /// Column names, in export order.
    pub const FIELDS: [&'static str; 10] = [
        "account_id",
        "statement_number",
        "date",
        "entry_date",
        "amount",
        "dc_mark",
        "transaction_type",
        "customer_reference",
        "bank_reference",
        "description",
    ];

    /// Whether this record is a debit.
    pub fn is_debit(&self) -> bool {
        self.dc_mark.as_deref().map(str::trim) == Some("D")
    }
}
