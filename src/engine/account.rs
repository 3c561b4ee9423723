use crate::engine::amount::{Amount, AmountError};
use crate::engine::{Transaction, TransactionType};
use thiserror::Error;

/// Smallest accepted operation amount: 0.01
pub const MIN_AMOUNT: Amount = Amount::from_units(100);
/// Largest accepted operation amount: 1 000 000
pub const MAX_AMOUNT: Amount = Amount::from_units(1_000_000 * 10_000);

const DEFAULT_DEPOSIT_DESCRIPTION: &str = "Account deposit";
const DEFAULT_WITHDRAWAL_DESCRIPTION: &str = "Cash withdrawal";
const OPENING_DESCRIPTION: &str = "Account opening";
const CLOSING_DESCRIPTION: &str = "Account closing";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountOperationError {
    #[error("Account is closed")]
    AccountClosed,

    #[error("Amount must be at least {}", MIN_AMOUNT)]
    AmountTooSmall,

    #[error("Amount must not exceed {}", MAX_AMOUNT)]
    AmountTooLarge,

    #[error("Insufficient funds, available: {available}")]
    InsufficientFunds { available: Amount },

    #[error("Account still holds {balance}, withdraw all funds first")]
    NonZeroBalance { balance: Amount },

    #[error(transparent)]
    Amount(#[from] AmountError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Open,
    Closed,
}

/// Checks an operation amount against [`MIN_AMOUNT`] and [`MAX_AMOUNT`], both inclusive.
pub fn validate_amount(amount: Amount) -> Result<(), AccountOperationError> {
    if amount < MIN_AMOUNT {
        return Err(AccountOperationError::AmountTooSmall);
    }
    if amount > MAX_AMOUNT {
        return Err(AccountOperationError::AmountTooLarge);
    }
    Ok(())
}

/// Description stored for a deposit or withdrawal, given what the user typed.
pub fn effective_description(typ: TransactionType, raw: &str) -> String {
    if !raw.trim().is_empty() {
        return raw.to_owned();
    }
    match typ {
        TransactionType::Deposit => DEFAULT_DEPOSIT_DESCRIPTION,
        TransactionType::Withdrawal => DEFAULT_WITHDRAWAL_DESCRIPTION,
        TransactionType::AccountOpened => OPENING_DESCRIPTION,
        TransactionType::AccountClosed => CLOSING_DESCRIPTION,
    }
    .to_owned()
}

// Bank account
#[derive(Debug, Clone)]
pub struct Account {
    number: String,
    bik: String,
    kpp: String,
    balance: Amount,
    status: AccountStatus,
    transactions: Vec<Transaction>,
}

impl Account {
    pub fn open(
        number: impl Into<String>,
        bik: impl Into<String>,
        kpp: impl Into<String>,
    ) -> Self {
        Account {
            number: number.into(),
            bik: bik.into(),
            kpp: kpp.into(),
            balance: Amount::ZERO,
            status: AccountStatus::Open,
            transactions: vec![Transaction::new(
                TransactionType::AccountOpened,
                Amount::ZERO,
                OPENING_DESCRIPTION,
            )],
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn bik(&self) -> &str {
        &self.bik
    }

    pub fn kpp(&self) -> &str {
        &self.kpp
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == AccountStatus::Open
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn deposit(&mut self, amount: Amount, description: &str) -> Result<(), AccountOperationError> {
        self.ensure_open()?;
        validate_amount(amount)?;

        let new_balance = self.balance.add(&amount)?;
        self.record(TransactionType::Deposit, amount, description, new_balance);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount, description: &str) -> Result<(), AccountOperationError> {
        self.ensure_open()?;
        validate_amount(amount)?;

        if amount > self.balance {
            return Err(AccountOperationError::InsufficientFunds {
                available: self.balance,
            });
        }

        let new_balance = self.balance.sub(&amount)?;
        self.record(TransactionType::Withdrawal, amount, description, new_balance);
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), AccountOperationError> {
        self.ensure_open()?;
        if !self.balance.is_zero() {
            return Err(AccountOperationError::NonZeroBalance {
                balance: self.balance,
            });
        }

        self.status = AccountStatus::Closed;
        self.transactions.push(Transaction::new(
            TransactionType::AccountClosed,
            Amount::ZERO,
            CLOSING_DESCRIPTION,
        ));
        Ok(())
    }

    /// Signed sum of the ledger: deposits minus withdrawals.
    pub fn recomputed_balance(&self) -> Result<Amount, AmountError> {
        self.transactions
            .iter()
            .try_fold(Amount::ZERO, |total, tx| match tx.typ() {
                TransactionType::Deposit => total.add(&tx.amount()),
                TransactionType::Withdrawal => total.sub(&tx.amount()),
                TransactionType::AccountOpened | TransactionType::AccountClosed => Ok(total),
            })
    }

    fn ensure_open(&self) -> Result<(), AccountOperationError> {
        match self.status {
            AccountStatus::Open => Ok(()),
            AccountStatus::Closed => Err(AccountOperationError::AccountClosed),
        }
    }

    // Balance and ledger always move together
    fn record(&mut self, typ: TransactionType, amount: Amount, description: &str, new_balance: Amount) {
        self.balance = new_balance;
        self.transactions
            .push(Transaction::new(typ, amount, effective_description(typ, description)));
        debug_assert_eq!(self.recomputed_balance(), Ok(self.balance));
    }
}
