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

//! Error types for account creation and transfers.

use crate::base::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger errors.
///
/// Every variant is an expected business outcome returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An account with this identifier already exists
    #[error("Account id {0} already exists!")]
    DuplicateAccountId(AccountId),

    /// Account identifier is empty
    #[error("account id must not be empty")]
    InvalidAccountId,

    /// Initial balance is below zero
    #[error("initial balance must not be negative")]
    NegativeBalance,

    /// Transfer amount is zero or negative
    #[error("Transfer amount must be positive")]
    NegativeOrZeroAmount,

    /// One of the transfer endpoints does not exist
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// Source balance is lower than the requested amount
    #[error("Insufficient balance {amount} to transfer from account {account_id}")]
    InsufficientBalance {
        amount: Decimal,
        account_id: AccountId,
    },

    /// Bounded lock acquisition expired
    #[error("timed out acquiring lock for account {0}")]
    LockTimeout(AccountId),
}

#[cfg(test)]
mod tests {
    use super::LedgerError;
    use crate::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LedgerError::DuplicateAccountId(AccountId::from("Id-123")).to_string(),
            "Account id Id-123 already exists!"
        );
        assert_eq!(
            LedgerError::InvalidAccountId.to_string(),
            "account id must not be empty"
        );
        assert_eq!(
            LedgerError::NegativeBalance.to_string(),
            "initial balance must not be negative"
        );
        assert_eq!(
            LedgerError::NegativeOrZeroAmount.to_string(),
            "Transfer amount must be positive"
        );
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::from("Id-100")).to_string(),
            "account Id-100 not found"
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                amount: dec!(10000),
                account_id: AccountId::from("Id-101"),
            }
            .to_string(),
            "Insufficient balance 10000 to transfer from account Id-101"
        );
        assert_eq!(
            LedgerError::LockTimeout(AccountId::from("Id-1")).to_string(),
            "timed out acquiring lock for account Id-1"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LedgerError::AccountNotFound(AccountId::from("Id-1"));
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
