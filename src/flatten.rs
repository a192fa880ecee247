//! Flattening of nested statements into one record per transaction.

use crate::types::{RawRecord, Statement};

/// Flatten statements into raw records.
///
/// Every transaction yields exactly one record, in statement order and then
/// transaction order. The account and statement number are copied from the
/// owning statement; the other fields are copied verbatim.
pub fn flatten(statements: &[Statement]) -> Vec<RawRecord> {
    statements
        .iter()
        .flat_map(|statement| {
            statement.transactions.iter().map(move |transaction| RawRecord {
                account_id: statement.account_id.clone(),
                statement_number: statement.statement_number.clone(),
                date: transaction.date.clone(),
                entry_date: transaction.entry_date.clone(),
                amount: transaction.amount.clone(),
                dc_mark: transaction.dc_mark.clone(),
                transaction_type: transaction.transaction_type.clone(),
                customer_reference: transaction.customer_reference.clone(),
                bank_reference: transaction.bank_reference.clone(),
                description: transaction.description.clone(),
            })
        })
        .collect()
}
