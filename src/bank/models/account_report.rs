use serde::{Deserialize, Serialize};

/// One output row per account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccountReport {
    pub account: String,
    pub owner: String,
    pub balance: String,
    pub transactions: usize,
}
