use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

use crate::engine::{
    Account, AccountAttribute, AccountId, AccountOperationError, AccountRegistry, Amount,
    Transaction, write_csv_ledger, write_text_report,
};

/// Amounts closer than this are considered equal when searching the ledger: 0.001
pub const AMOUNT_SEARCH_TOLERANCE: Amount = Amount::from_units(10);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No active account, open an account first")]
    NoActiveAccount,

    #[error("Account {0} is already open")]
    AccountAlreadyOpen(String),

    #[error(transparent)]
    Account(#[from] AccountOperationError),

    #[error("Cannot write export file")]
    Io(#[from] std::io::Error),

    #[error("Cannot write CSV export")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriterion {
    /// Exact kind label, ignoring case
    Kind(String),
    /// Within [`AMOUNT_SEARCH_TOLERANCE`]
    Amount(Amount),
    /// Substring of the description, ignoring case
    Description(String),
}

impl SearchCriterion {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            SearchCriterion::Kind(label) => tx.typ().label().to_lowercase() == label.to_lowercase(),
            SearchCriterion::Amount(amount) => {
                tx.amount().is_close_to(amount, AMOUNT_SEARCH_TOLERANCE)
            }
            SearchCriterion::Description(text) => tx
                .description()
                .to_lowercase()
                .contains(&text.to_lowercase()),
        }
    }
}

/// State of one interactive run: every account opened so far and the one being worked on.
#[derive(Debug, Default)]
pub struct Session {
    registry: AccountRegistry,
    active: Option<AccountId>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            registry: AccountRegistry::new(),
            active: None,
        }
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn active_account(&self) -> Option<&Account> {
        self.active.and_then(|id| self.registry.get(id))
    }

    /// Fails while an account is active: only one account is worked on at a time.
    pub fn ensure_can_open(&self) -> Result<(), SessionError> {
        match self.active_account() {
            Some(current) => Err(SessionError::AccountAlreadyOpen(current.number().to_owned())),
            None => Ok(()),
        }
    }

    /// Fails unless there is an account to work on.
    pub fn ensure_active(&self) -> Result<(), SessionError> {
        self.active().map(|_| ())
    }

    pub fn open_account(&mut self, number: &str, bik: &str, kpp: &str) -> Result<AccountId, SessionError> {
        self.ensure_can_open()?;

        let id = self.registry.register(Account::open(number, bik, kpp));
        self.active = Some(id);
        log::info!("Opened account {number} ({} accounts registered)", self.registry.len());
        Ok(id)
    }

    /// Returns the balance after the deposit.
    pub fn deposit(&mut self, amount: Amount, description: &str) -> Result<Amount, SessionError> {
        let account = self.active_mut()?;
        account.deposit(amount, description)?;
        log::debug!("Deposited {amount} into {}", account.number());
        Ok(account.balance())
    }

    /// Returns the balance after the withdrawal.
    pub fn withdraw(&mut self, amount: Amount, description: &str) -> Result<Amount, SessionError> {
        let account = self.active_mut()?;
        account.withdraw(amount, description)?;
        log::debug!("Withdrew {amount} from {}", account.number());
        Ok(account.balance())
    }

    /// Closes the active account; on success there is no active account anymore.
    pub fn close_account(&mut self) -> Result<(), SessionError> {
        let account = self.active_mut()?;
        account.close()?;
        log::info!("Closed account {}", account.number());
        self.active = None;
        Ok(())
    }

    pub fn balance(&self) -> Result<Amount, SessionError> {
        Ok(self.active()?.balance())
    }

    pub fn transactions(&self) -> Result<&[Transaction], SessionError> {
        Ok(self.active()?.transactions())
    }

    /// Entries of the active account's ledger matching `criterion`, oldest first.
    pub fn search_transactions<'a>(
        &'a self,
        criterion: &'a SearchCriterion,
    ) -> Result<impl Iterator<Item = &'a Transaction> + 'a, SessionError> {
        let ledger = self.active()?.transactions();
        Ok(ledger.iter().filter(move |tx| criterion.matches(tx)))
    }

    pub fn search_accounts<'a>(
        &'a self,
        attribute: AccountAttribute,
        value: &str,
    ) -> impl Iterator<Item = &'a Account> + use<'a> {
        self.registry.find_by_attribute(attribute, value)
    }

    /// Overwrites `destination` with the text report of the active account.
    pub fn export_to_text(&self, destination: &Path) -> Result<(), SessionError> {
        let account = self.active()?;
        let file = File::create(destination)?;
        write_text_report(account, BufWriter::new(file))?;
        log::info!("Exported account {} to {}", account.number(), destination.display());
        Ok(())
    }

    /// Overwrites `destination` with the ledger of the active account as CSV.
    pub fn export_to_csv(&self, destination: &Path) -> Result<(), SessionError> {
        let account = self.active()?;
        let file = File::create(destination)?;
        write_csv_ledger(account, BufWriter::new(file))?;
        log::info!("Exported ledger of {} to {}", account.number(), destination.display());
        Ok(())
    }

    fn active(&self) -> Result<&Account, SessionError> {
        self.active_account().ok_or(SessionError::NoActiveAccount)
    }

    fn active_mut(&mut self) -> Result<&mut Account, SessionError> {
        self.active
            .and_then(|id| self.registry.get_mut(id))
            .ok_or(SessionError::NoActiveAccount)
    }
}
