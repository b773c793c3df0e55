mod account;
mod account_report;
mod transaction;

pub use account::{Account, AccountError};
pub use account_report::AccountReport;
pub use transaction::{Transaction, TransactionType};
