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

//! Thread-safe in-memory account store.
//!
//! The store is the single source of truth for balances. Every read returns a
//! clone, so callers never hold a live reference into the map.

use crate::account::Account;
use crate::base::AccountId;
use crate::error::LedgerError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;

/// A concurrent map from account identifier to account state.
///
/// Backed by a sharded [`DashMap`]; single-key operations are atomic and only
/// contend on the shard that owns the key. The store never takes transfer locks.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, Account>,
}

impl AccountStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Inserts the account if its identifier is not taken yet.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAccountId`] - Identifier is empty or blank.
    /// - [`LedgerError::NegativeBalance`] - Balance is below zero.
    /// - [`LedgerError::DuplicateAccountId`] - Identifier is already taken. The
    ///   existing account is left untouched.
    pub fn create(&self, account: Account) -> Result<(), LedgerError> {
        if account.id().is_blank() {
            return Err(LedgerError::InvalidAccountId);
        }
        if account.balance() < Decimal::ZERO {
            return Err(LedgerError::NegativeBalance);
        }

        // Entry API holds the shard lock across check-and-insert
        match self.accounts.entry(account.id().clone()) {
            Entry::Occupied(entry) => Err(LedgerError::DuplicateAccountId(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(account);
                Ok(())
            }
        }
    }

    /// Returns a snapshot of the account, or `None` if unknown.
    pub fn get(&self, account_id: &str) -> Option<Account> {
        self.accounts.get(account_id).map(|entry| entry.value().clone())
    }

    /// Replaces the stored state for the account's identifier.
    ///
    /// Only the transfer engine calls this, and only while it holds the lock
    /// for that account.
    pub(crate) fn put(&self, account: Account) {
        self.accounts.insert(account.id().clone(), account);
    }

    /// Returns snapshots of every account, in no particular order.
    pub fn list_all(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Removes every account.
    pub fn clear(&self) {
        self.accounts.clear();
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances.
    ///
    /// Not a consistent cut while transfers are in flight: shards are visited
    /// one at a time.
    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(|entry| entry.value().balance()).sum()
    }
}
