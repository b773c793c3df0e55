mod account_id;
mod transaction_id;

pub use account_id::AccountId;
pub use transaction_id::TransactionId;
