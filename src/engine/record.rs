use serde::Serialize;

use crate::engine::Transaction;

/// One ledger entry as written to a CSV export.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub typ: String,
    pub amount: String,
    pub description: String,
    pub timestamp: String,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        TransactionRecord {
            typ: tx.typ().label().to_owned(),
            amount: tx.amount().to_string(),
            description: tx.description().to_owned(),
            timestamp: tx.formatted_timestamp(),
        }
    }
}
