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

//! Account state.
//!
//! An [`Account`] is a plain value: the store keeps one copy per identifier and
//! hands out clones. Balance changes happen on a clone inside the transfer engine
//! and are written back with the account's lock held.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ledger_transfer_rs::Account;
//!
//! let account = Account::new("Id-123", dec!(1000));
//! assert_eq!(account.balance(), dec!(1000));
//! ```

use crate::base::AccountId;
use crate::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    account_id: AccountId,
    balance: Decimal,
}

impl Account {
    pub fn new(account_id: impl Into<AccountId>, balance: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            balance,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Increases the balance.
    pub(crate) fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NegativeOrZeroAmount);
        }
        self.balance += amount;
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance.
    pub(crate) fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NegativeOrZeroAmount);
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                amount,
                account_id: self.account_id.clone(),
            });
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deposit_increases_balance() {
        let mut account = Account::new("Id-1", dec!(100.00));
        account.deposit(dec!(0.25)).unwrap();
        assert_eq!(account.balance(), dec!(100.25));
    }

    #[test]
    fn withdraw_decreases_balance() {
        let mut account = Account::new("Id-1", dec!(100.00));
        account.withdraw(dec!(30.00)).unwrap();
        assert_eq!(account.balance(), dec!(70.00));
    }

    #[test]
    fn withdraw_entire_balance_reaches_zero() {
        let mut account = Account::new("Id-1", dec!(0.0001));
        account.withdraw(dec!(0.0001)).unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    fn withdraw_insufficient_returns_error() {
        let mut account = Account::new("Id-1", dec!(50.00));
        let result = account.withdraw(dec!(100.00));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                amount: dec!(100.00),
                account_id: AccountId::from("Id-1"),
            })
        );
        assert_eq!(account.balance(), dec!(50.00));
    }

    #[test]
    fn non_positive_amounts_rejected() {
        let mut account = Account::new("Id-1", dec!(50.00));
        assert_eq!(
            account.deposit(Decimal::ZERO),
            Err(LedgerError::NegativeOrZeroAmount)
        );
        assert_eq!(
            account.withdraw(dec!(-1)),
            Err(LedgerError::NegativeOrZeroAmount)
        );
        assert_eq!(account.balance(), dec!(50.00));
    }

    #[test]
    fn arithmetic_is_exact() {
        let mut account = Account::new("Id-1", dec!(0.3));
        account.withdraw(dec!(0.1)).unwrap();
        account.withdraw(dec!(0.2)).unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    // === Serialization Tests ===

    #[test]
    fn serializes_camel_case_with_string_balance() {
        let account = Account::new("Id-123", dec!(123.45));
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, r#"{"accountId":"Id-123","balance":"123.45"}"#);
    }

    #[test]
    fn deserializes_from_json() {
        let account: Account =
            serde_json::from_str(r#"{"accountId":"Id-9","balance":"0.5"}"#).unwrap();
        assert_eq!(account.id(), &AccountId::from("Id-9"));
        assert_eq!(account.balance(), dec!(0.5));
    }
}
