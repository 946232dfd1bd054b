// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Transfer engine.
//!
//! The [`TransferEngine`] is the central component that creates accounts and
//! moves funds between them. It owns the [`AccountStore`] and a per-account
//! [`LockRegistry`].
//!
//! # Locking Protocol
//!
//! A transfer takes the locks of both accounts involved, always in ascending
//! [`AccountId`] order, and releases them in the reverse order. Because every
//! transfer agrees on the same global order there is no circular wait, whatever
//! the direction of the transfers racing on a pair of accounts.
//!
//! ```text
//!   transfer(B -> A)         transfer(A -> B)
//!        lock(A)  ◄── same order ──►  lock(A)
//!        lock(B)                      lock(B)
//!        re-read, validate, write both
//!        unlock(B)                    unlock(B)
//!        unlock(A)                    unlock(A)
//! ```
//!
//! A transfer from an account to itself takes its single lock once.
//!
//! # Thread Safety
//!
//! Reads (`get_account`, `list_accounts`) and account creation go straight to
//! the store and never wait on transfer locks. Transfers on disjoint account
//! pairs run in parallel.

use crate::account::Account;
use crate::base::AccountId;
use crate::config::EngineConfig;
use crate::error::LedgerError;
use crate::lock_registry::LockRegistry;
use crate::notification::{LoggingNotificationService, NotificationService};
use crate::store::AccountStore;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Ledger engine that manages accounts and transfers between them.
///
/// # Invariants
///
/// - Every balance observable through [`get_account`](Self::get_account) is `>= 0`.
/// - A balance only changes inside [`transfer`](Self::transfer), with that
///   account's lock held.
/// - A successful transfer of `a` moves exactly `a` from source to destination;
///   the sum of all balances is unchanged.
/// - A failed transfer leaves both balances untouched.
pub struct TransferEngine {
    /// Account state indexed by account ID.
    store: AccountStore,
    /// Per-account transfer locks, created on first use.
    locks: LockRegistry,
    notifier: Arc<dyn NotificationService>,
    config: EngineConfig,
}

impl TransferEngine {
    /// Creates an engine with no accounts that logs its notifications.
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(LoggingNotificationService))
    }

    /// Creates an engine with no accounts and a custom notification service.
    pub fn with_notifier(notifier: Arc<dyn NotificationService>) -> Self {
        TransferEngine {
            store: AccountStore::new(),
            locks: LockRegistry::new(),
            notifier,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens a new account with the given initial balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAccountId`] - Identifier is empty.
    /// - [`LedgerError::NegativeBalance`] - Initial balance is below zero.
    /// - [`LedgerError::DuplicateAccountId`] - Identifier is already taken.
    pub fn create_account(
        &self,
        account_id: impl Into<AccountId>,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError> {
        let account_id = account_id.into();
        self.store
            .create(Account::new(account_id.clone(), initial_balance))?;
        tracing::debug!(%account_id, balance = %initial_balance, "account created");
        Ok(())
    }

    /// Retrieves a snapshot of an account.
    ///
    /// Returns `None` if no account exists for the given ID.
    pub fn get_account(&self, account_id: &str) -> Option<Account> {
        self.store.get(account_id)
    }

    /// Returns snapshots of all accounts, in no particular order.
    pub fn list_accounts(&self) -> Vec<Account> {
        self.store.list_all()
    }

    /// Removes every account.
    ///
    /// Locks already handed out stay in the registry, so a transfer racing
    /// with a reset still serializes correctly against later ones.
    pub fn reset_all_accounts(&self) {
        self.store.clear();
        tracing::info!("all accounts cleared");
    }

    /// Moves `amount` from one account to another.
    ///
    /// The amount is checked before any lock is taken. Both accounts are then
    /// locked in ascending ID order and re-read from the store, so validation
    /// always sees the latest committed balances. On success the notification
    /// service is told once per side, before the locks are released.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NegativeOrZeroAmount`] - Amount is zero or negative.
    /// - [`LedgerError::AccountNotFound`] - Either account does not exist.
    /// - [`LedgerError::InsufficientBalance`] - Source balance is below `amount`.
    /// - [`LedgerError::LockTimeout`] - A lock was not acquired within
    ///   [`EngineConfig::lock_timeout`].
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            tracing::warn!(%from, %to, %amount, "rejected non-positive transfer amount");
            return Err(LedgerError::NegativeOrZeroAmount);
        }

        let result = self.lock_and_apply(from, to, amount);

        match &result {
            Ok(()) => tracing::info!(%from, %to, %amount, "transfer completed"),
            Err(e) => tracing::warn!(%from, %to, %amount, error = %e, "transfer rejected"),
        }
        result
    }

    /// Returns the underlying account store.
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Returns the per-account lock registry.
    pub fn lock_registry(&self) -> &LockRegistry {
        &self.locks
    }

    /// Takes the locks for `from` and `to` in ascending ID order, applies the
    /// transfer and releases the locks in reverse order on every exit path.
    fn lock_and_apply(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if from == to {
            // Locks are not re-entrant: take the single lock once
            let lock = self.locks.get_or_create(from);
            let _guard = self.acquire(&lock, from)?;
            return self.transfer_to_self(from, amount);
        }

        let (first_id, second_id) = if from < to { (from, to) } else { (to, from) };
        let first_lock = self.locks.get_or_create(first_id);
        let second_lock = self.locks.get_or_create(second_id);

        let first_guard = self.acquire(&first_lock, first_id)?;
        let second_guard = self.acquire(&second_lock, second_id)?;
        tracing::debug!(%first_id, %second_id, "acquired transfer locks");

        let result = self.apply_transfer(from, to, amount);

        drop(second_guard);
        drop(first_guard);
        result
    }

    fn acquire<'a>(
        &self,
        lock: &'a Mutex<()>,
        account_id: &AccountId,
    ) -> Result<MutexGuard<'a, ()>, LedgerError> {
        match self.config.lock_timeout {
            None => Ok(lock.lock()),
            Some(timeout) => lock
                .try_lock_for(timeout)
                .ok_or_else(|| LedgerError::LockTimeout(account_id.clone())),
        }
    }

    /// Debits, credits and writes back both accounts. Caller holds both locks.
    fn apply_transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let mut source = self.load(from)?;
        let mut destination = self.load(to)?;

        // Both checks run on local copies; nothing is written until both pass.
        source.withdraw(amount)?;
        destination.deposit(amount)?;

        tracing::debug!(
            account_id = %from,
            balance = %source.balance(),
            "debited"
        );
        tracing::debug!(
            account_id = %to,
            balance = %destination.balance(),
            "credited"
        );
        self.store.put(source.clone());
        self.store.put(destination.clone());

        self.notify(&source, &destination, amount);
        Ok(())
    }

    /// Validates a self-transfer. Caller holds the account's lock.
    ///
    /// The balance is unchanged, but the account must exist and cover the amount.
    fn transfer_to_self(&self, account_id: &AccountId, amount: Decimal) -> Result<(), LedgerError> {
        let account = self.load(account_id)?;
        if account.balance() < amount {
            return Err(LedgerError::InsufficientBalance {
                amount,
                account_id: account_id.clone(),
            });
        }

        self.notify(&account, &account, amount);
        Ok(())
    }

    fn load(&self, account_id: &AccountId) -> Result<Account, LedgerError> {
        self.store
            .get(account_id.as_str())
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.clone()))
    }

    fn notify(&self, source: &Account, destination: &Account, amount: Decimal) {
        self.notifier
            .notify_about_transfer(source, &format!("Transferred amount :{amount}"));
        self.notifier
            .notify_about_transfer(destination, &format!("Received amount :{amount}"));
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}
