use crate::ids::{AccountId, TransactionId};
use crate::Money;

use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
}

impl TransactionType {
    /// Whether this kind of transaction adds to the balance
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::TransferIn)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
            Self::TransferOut => "TRANSFER_OUT",
            Self::TransferIn => "TRANSFER_IN",
        };

        return write!(f, "{name}");
    }
}

/// Immutable record of one balance-affecting event on an account
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    transaction_type: TransactionType,
    amount: Money,
    timestamp: DateTime<Utc>,
    description: String,
}

impl Transaction {
    /// Callers must have validated that `amount` is positive.
    pub(crate) fn new(
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        debug_assert!(amount.is_positive());

        Self {
            id: TransactionId::random(),
            transaction_type,
            amount,
            timestamp: Utc::now(),
            description: description.into(),
        }
    }

    pub(crate) fn initial_balance(amount: Money) -> Self {
        Self::new(TransactionType::Deposit, amount, "Initial balance")
    }

    pub(crate) fn deposit(amount: Money) -> Self {
        Self::new(TransactionType::Deposit, amount, "Deposit")
    }

    pub(crate) fn withdrawal(amount: Money) -> Self {
        Self::new(TransactionType::Withdraw, amount, "Withdrawal")
    }

    pub(crate) fn transfer_out(amount: Money, to: &AccountId) -> Self {
        Self::new(TransactionType::TransferOut, amount, format!("Transfer to {to}"))
    }

    pub(crate) fn transfer_in(amount: Money, from: &AccountId) -> Self {
        Self::new(TransactionType::TransferIn, amount, format!("Transfer from {from}"))
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(
            f,
            "[{}] {} - {} - {} - {}",
            self.id.short(),
            self.transaction_type,
            self.amount,
            self.timestamp.format("%d-%m-%Y %H:%M:%S"),
            self.description,
        );
    }
}
