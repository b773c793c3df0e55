use crate::ids::AccountId;
use crate::Money;

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAccountEvent {
    pub account_id: AccountId,
    pub owner: String,
    pub initial_balance: Money,
}
