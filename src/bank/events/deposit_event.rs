use crate::ids::AccountId;
use crate::Money;

#[derive(Debug, Clone, PartialEq)]
pub struct DepositEvent {
    pub account_id: AccountId,
    pub amount: Money,
}
