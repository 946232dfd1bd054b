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

//! Per-account lock registry.
//!
//! Hands out one shared mutex per account identifier, created lazily on first
//! use. Entries are never removed.

use crate::base::AccountId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to an account's transfer lock.
pub type AccountLock = Arc<Mutex<()>>;

/// A thread-safe map of account identifiers to transfer locks.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<AccountId, AccountLock>,
}

impl LockRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Returns the lock for `account_id`, creating it if this is the first use.
    ///
    /// Concurrent callers for the same new identifier always receive the same
    /// lock instance.
    pub fn get_or_create(&self, account_id: &AccountId) -> AccountLock {
        if let Some(lock) = self.locks.get(account_id.as_str()) {
            return Arc::clone(lock.value());
        }

        // Entry API for atomic check-and-insert
        let lock = self
            .locks
            .entry(account_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(lock.value())
    }

    /// Number of identifiers that have a lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` if no lock has been handed out yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
