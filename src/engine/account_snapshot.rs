use crate::engine::{Account, AccountStatus};

/// A Snapshot of an Account to easily view the content
/// It is used for decoupling account search output from Account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub number: String,
    pub bik: String,
    pub kpp: String,
    pub balance: String,
    pub status: String,
    pub transactions: usize,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        AccountSnapshot {
            number: account.number().to_owned(),
            bik: account.bik().to_owned(),
            kpp: account.kpp().to_owned(),
            balance: account.balance().to_string(),
            status: match account.status() {
                AccountStatus::Open => "Open",
                AccountStatus::Closed => "Closed",
            }
            .to_owned(),
            transactions: account.transactions().len(),
        }
    }
}
