use chrono::{DateTime, Local};
use std::fmt;

use crate::engine::Amount;

/// Currency label used everywhere an amount is shown to the user.
pub const CURRENCY: &str = "RUB";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    AccountOpened,
    AccountClosed,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Deposit,
        TransactionType::Withdrawal,
        TransactionType::AccountOpened,
        TransactionType::AccountClosed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::AccountOpened => "ACCOUNT OPENED",
            TransactionType::AccountClosed => "ACCOUNT CLOSED",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One ledger entry. Fields are private so an entry cannot change once recorded.
#[derive(Debug, Clone)]
pub struct Transaction {
    typ: TransactionType,
    amount: Amount,
    description: String,
    timestamp: DateTime<Local>,
}

impl Transaction {
    pub fn new(typ: TransactionType, amount: Amount, description: impl Into<String>) -> Self {
        Transaction {
            typ,
            amount,
            description: description.into(),
            timestamp: Local::now(),
        }
    }

    pub fn typ(&self) -> TransactionType {
        self.typ
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} — {} ({})",
            self.typ,
            self.amount,
            CURRENCY,
            self.description,
            self.formatted_timestamp()
        )
    }
}
