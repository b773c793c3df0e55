pub mod events;
pub mod ids;
pub mod input;
mod ledger;
pub mod models;
mod money;
mod result;

pub use ledger::{Ledger, LedgerError};
pub use models::{Account, AccountError, AccountReport, Transaction, TransactionType};
pub use money::{Money, MoneyError};
pub use result::{LedgerResult, Result};
