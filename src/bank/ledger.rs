use crate::events::{DepositEvent, LedgerEvent, OpenAccountEvent, TransferEvent, WithdrawalEvent};
use crate::ids::AccountId;
use crate::models::{Account, AccountError, AccountReport, Transaction};
use crate::{LedgerResult, Money};

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(AccountId),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Registry mapping account IDs to accounts, and the entry point for all operations.
///
/// Safe to share between threads. Each account is locked independently; a transfer
/// takes both account locks in ascending ID order, so two transfers between the same
/// pair of accounts in opposite directions cannot deadlock.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account under its ID. An existing account with the same ID is replaced.
    pub fn add(&self, account: Account) {
        let id = account.id().clone();

        log::debug!("Adding account: {account}");

        if let Some(previous) = self.accounts.insert(id, Arc::new(account)) {
            log::debug!("Replaced existing account: {previous}");
        }
    }

    /// Builds and registers an account. A zero initial balance is allowed, a negative one is not.
    pub fn add_account(
        &self,
        id: impl Into<AccountId>,
        owner: impl Into<String>,
        initial_balance: Money,
    ) -> LedgerResult {
        if initial_balance.is_negative() {
            Err(AccountError::InvalidAmount(initial_balance))?
        }

        self.add(Account::new(id, owner, initial_balance));

        Ok(())
    }

    pub fn resolve(&self, id: &AccountId) -> LedgerResult<Arc<Account>> {
        // Clone the Arc out so the map's shard guard is released before any account lock
        let account = self
            .accounts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))?;

        Ok(account)
    }

    pub fn deposit(&self, id: &AccountId, amount: Money) -> LedgerResult {
        self.resolve(id)?.deposit(amount)?;

        Ok(())
    }

    pub fn withdraw(&self, id: &AccountId, amount: Money) -> LedgerResult {
        self.resolve(id)?.withdraw(amount)?;

        Ok(())
    }

    /// Moves `amount` from one account to another as a single atomic step.
    ///
    /// Both account locks are held while the source is debited and the destination is
    /// credited. If any check fails, neither account is modified.
    pub fn transfer(&self, from: &AccountId, to: &AccountId, amount: Money) -> LedgerResult {
        let source = self.resolve(from)?;
        let destination = self.resolve(to)?;

        if source.id() == destination.id() {
            Err(LedgerError::SameAccount(from.clone()))?
        }

        let source_first = source.id() < destination.id();

        let (first, second) = if source_first {
            (&source, &destination)
        } else {
            (&destination, &source)
        };

        let mut first_state = first.lock();
        let mut second_state = second.lock();

        let (source_state, destination_state) = if source_first {
            (&mut *first_state, &mut *second_state)
        } else {
            (&mut *second_state, &mut *first_state)
        };

        // credit can only fail on overflow, check it up front so the debit never needs undoing
        destination_state.ensure_can_credit(amount)?;

        source_state.debit_for_transfer(amount, destination.id())?;
        destination_state.credit_for_transfer(amount, source.id())?;

        log::debug!(
            "Transferred {amount} from {from} (balance: {}) to {to} (balance: {})",
            source_state.balance(),
            destination_state.balance(),
        );

        Ok(())
    }

    pub fn balance(&self, id: &AccountId) -> LedgerResult<Money> {
        Ok(self.resolve(id)?.balance())
    }

    pub fn history(&self, id: &AccountId) -> LedgerResult<Vec<Transaction>> {
        Ok(self.resolve(id)?.history())
    }

    pub fn process_event(&self, event: LedgerEvent) -> LedgerResult {
        log::debug!("Processing ledger event: {event:?}");

        match event {
            LedgerEvent::OpenAccount(OpenAccountEvent {
                account_id,
                owner,
                initial_balance,
            }) => self.add_account(account_id, owner, initial_balance)?,

            LedgerEvent::Deposit(DepositEvent { account_id, amount }) => {
                self.deposit(&account_id, amount)?
            }

            LedgerEvent::Withdrawal(WithdrawalEvent { account_id, amount }) => {
                self.withdraw(&account_id, amount)?
            }

            LedgerEvent::Transfer(TransferEvent { from, to, amount }) => {
                self.transfer(&from, &to, amount)?
            }
        }

        Ok(())
    }

    /// Reports for every account, sorted by account ID
    pub fn build_report(&self) -> Vec<AccountReport> {
        let mut accounts = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect::<Vec<_>>();

        accounts.sort_by(|a, b| a.id().cmp(b.id()));

        accounts.iter().map(|account| account.report()).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
