mod deposit_event;
mod open_account_event;
mod transfer_event;
mod withdrawal_event;

pub use deposit_event::DepositEvent;
pub use open_account_event::OpenAccountEvent;
pub use transfer_event::TransferEvent;
pub use withdrawal_event::WithdrawalEvent;

/// Typed ledger event, forcing correct handling through the type-system
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    OpenAccount(OpenAccountEvent),
    Deposit(DepositEvent),
    Withdrawal(WithdrawalEvent),
    Transfer(TransferEvent),
}

impl LedgerEvent {
    /// Account registration must happen before concurrent use of the ledger
    pub fn is_registration(&self) -> bool {
        matches!(self, Self::OpenAccount(_))
    }
}
