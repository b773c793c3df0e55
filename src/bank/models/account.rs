use super::{AccountReport, Transaction};

use crate::ids::AccountId;
use crate::money::{Money, MoneyError};

use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid amount: {0} (amount must be positive)")]
    InvalidAmount(Money),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Money, available: Money },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Balance and transaction log, only reachable through the owning account's lock
#[derive(Debug)]
pub(crate) struct AccountState {
    balance: Money,
    history: Vec<Transaction>,
}

impl AccountState {
    fn ensure_positive(amount: Money) -> Result<(), AccountError> {
        if !amount.is_positive() {
            Err(AccountError::InvalidAmount(amount))?
        }

        Ok(())
    }

    /// Checks a debit of `amount` would succeed, without applying it
    pub(crate) fn ensure_can_debit(&self, amount: Money) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;

        if self.balance < amount {
            Err(AccountError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            })?
        }

        Ok(())
    }

    /// Checks a credit of `amount` would succeed, without applying it
    pub(crate) fn ensure_can_credit(&self, amount: Money) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;

        let mut balance = self.balance;
        balance.add(&amount)?;

        Ok(())
    }

    fn credit(&mut self, transaction: Transaction) -> Result<(), AccountError> {
        self.ensure_can_credit(transaction.amount())?;

        self.balance.add(&transaction.amount())?;
        self.history.push(transaction);

        Ok(())
    }

    fn debit(&mut self, transaction: Transaction) -> Result<(), AccountError> {
        self.ensure_can_debit(transaction.amount())?;

        self.balance.sub(&transaction.amount())?;
        self.history.push(transaction);

        Ok(())
    }

    pub(crate) fn deposit(&mut self, amount: Money) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;
        self.credit(Transaction::deposit(amount))
    }

    pub(crate) fn withdraw(&mut self, amount: Money) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;
        self.debit(Transaction::withdrawal(amount))
    }

    pub(crate) fn debit_for_transfer(
        &mut self,
        amount: Money,
        to: &AccountId,
    ) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;
        self.debit(Transaction::transfer_out(amount, to))
    }

    pub(crate) fn credit_for_transfer(
        &mut self,
        amount: Money,
        from: &AccountId,
    ) -> Result<(), AccountError> {
        Self::ensure_positive(amount)?;
        self.credit(Transaction::transfer_in(amount, from))
    }

    pub(crate) fn balance(&self) -> Money {
        self.balance
    }
}

/// Holder of a balance and its transaction log.
///
/// Every read and mutation takes the account's own lock for its full duration, so each
/// operation is atomic to other threads. The lock itself is never handed out publicly.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    owner: String,
    state: Mutex<AccountState>,
}

impl Account {
    /// Creates an account. A positive initial balance is recorded as a deposit.
    pub fn new(id: impl Into<AccountId>, owner: impl Into<String>, initial_balance: Money) -> Self {
        let mut history = vec![];

        if initial_balance.is_positive() {
            history.push(Transaction::initial_balance(initial_balance));
        }

        Self {
            id: id.into(),
            owner: owner.into(),
            state: Mutex::new(AccountState {
                balance: initial_balance,
                history,
            }),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn deposit(&self, amount: Money) -> Result<(), AccountError> {
        let mut state = self.lock();
        state.deposit(amount)?;

        log::debug!("{} - deposited {amount}, new balance: {}", self.id, state.balance);

        Ok(())
    }

    pub fn withdraw(&self, amount: Money) -> Result<(), AccountError> {
        let mut state = self.lock();
        state.withdraw(amount)?;

        log::debug!("{} - withdrew {amount}, new balance: {}", self.id, state.balance);

        Ok(())
    }

    pub fn debit_for_transfer(&self, amount: Money, to: &AccountId) -> Result<(), AccountError> {
        self.lock().debit_for_transfer(amount, to)
    }

    pub fn credit_for_transfer(&self, amount: Money, from: &AccountId) -> Result<(), AccountError> {
        self.lock().credit_for_transfer(amount, from)
    }

    pub fn balance(&self) -> Money {
        self.lock().balance
    }

    /// Returns a copy of the transaction log, oldest first
    pub fn history(&self) -> Vec<Transaction> {
        self.lock().history.clone()
    }

    /// Consistent snapshot of balance and log size
    pub fn report(&self) -> AccountReport {
        let state = self.lock();

        AccountReport {
            account: self.id.to_string(),
            owner: self.owner.clone(),
            balance: state.balance.to_string(),
            transactions: state.history.len(),
        }
    }

    /// Only the ledger takes the guard directly, to hold two accounts during a transfer.
    pub(crate) fn lock(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "Account[{} - {}: {}]", self.id, self.owner, self.balance());
    }
}
