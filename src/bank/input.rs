use crate::events::{DepositEvent, LedgerEvent, OpenAccountEvent, TransferEvent, WithdrawalEvent};
use crate::ids::AccountId;
use crate::Money;
use crate::Result;

use serde::Deserialize;

use thiserror::Error;

/// Represents an input row that a CSV record would deserialize into
#[derive(Deserialize, Debug, Clone)]
pub struct InputEvent {
    #[serde(rename = "type")]
    pub typ: InputEventType,

    pub account: String,
    pub counterparty: Option<String>,
    pub owner: Option<String>,
    pub amount: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputEventType {
    Open,
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Error, Debug)]
pub enum InputParseError {
    #[error("Error parsing input event: owner missing from open: {0:?}")]
    NoOwner(InputEvent),

    #[error("Error parsing input event: amount value missing from {0:?}")]
    NoAmount(InputEvent),

    #[error("Error parsing input event: counterparty missing from transfer: {0:?}")]
    NoCounterparty(InputEvent),
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl InputEvent {
    pub fn parse_event(self) -> Result<LedgerEvent> {
        let account_id = AccountId::new(self.account.trim());

        let event = match self.typ {
            InputEventType::Open => {
                let owner = non_empty(&self.owner)
                    .ok_or_else(|| InputParseError::NoOwner(self.clone()))?;

                let initial_balance = match non_empty(&self.amount) {
                    Some(amount) => Money::parse(amount)?,
                    None => Money::ZERO,
                };

                LedgerEvent::OpenAccount(OpenAccountEvent {
                    account_id,
                    owner: owner.to_string(),
                    initial_balance,
                })
            }
            InputEventType::Deposit => LedgerEvent::Deposit(DepositEvent {
                account_id,
                amount: self.parse_amount()?,
            }),
            InputEventType::Withdraw => LedgerEvent::Withdrawal(WithdrawalEvent {
                account_id,
                amount: self.parse_amount()?,
            }),
            InputEventType::Transfer => {
                let to = non_empty(&self.counterparty)
                    .ok_or_else(|| InputParseError::NoCounterparty(self.clone()))?;

                LedgerEvent::Transfer(TransferEvent {
                    from: account_id,
                    to: AccountId::new(to),
                    amount: self.parse_amount()?,
                })
            }
        };

        Ok(event)
    }

    fn parse_amount(&self) -> Result<Money> {
        let amount = non_empty(&self.amount)
            .ok_or_else(|| InputParseError::NoAmount(self.clone()))?;

        Ok(Money::parse(amount)?)
    }
}
