mod account;
mod account_snapshot;
mod amount;
mod export;
mod record;
mod registry;
mod transaction;

pub use account::{
    Account, AccountOperationError, AccountStatus, MAX_AMOUNT, MIN_AMOUNT, effective_description,
    validate_amount,
};
pub use account_snapshot::AccountSnapshot;
pub use amount::{Amount, AmountError};
pub use export::{HISTORY_HEADER, REPORT_HEADER, write_csv_ledger, write_text_report};
pub use record::TransactionRecord;
pub use registry::{AccountAttribute, AccountId, AccountRegistry};
pub use transaction::{CURRENCY, Transaction, TransactionType};
