use crate::ids::AccountId;
use crate::Money;

#[derive(Debug, Clone, PartialEq)]
pub struct TransferEvent {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Money,
}
