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

//! # Ledger Transfer
//!
//! This library provides an in-memory account ledger with a concurrent
//! transfer engine: accounts are opened with an initial balance and funds move
//! between them through peer-to-peer transfers.
//!
//! ## Core Components
//!
//! - [`TransferEngine`]: Creates accounts and performs transfers under per-account locks
//! - [`AccountStore`]: Concurrent map holding the current state of every account
//! - [`Account`]: Account snapshot with its identifier and balance
//! - [`NotificationService`]: Port notified of both sides of every successful transfer
//! - [`LedgerError`]: Error types for account creation and transfer failures
//!
//! ## Example
//!
//! ```
//! use ledger_transfer_rs::{AccountId, TransferEngine};
//! use rust_decimal_macros::dec;
//!
//! let engine = TransferEngine::new();
//! engine.create_account("Id-101", dec!(5000)).unwrap();
//! engine.create_account("Id-102", dec!(2000)).unwrap();
//!
//! engine
//!     .transfer(&AccountId::from("Id-101"), &AccountId::from("Id-102"), dec!(1000))
//!     .unwrap();
//!
//! assert_eq!(engine.get_account("Id-101").unwrap().balance(), dec!(4000));
//! assert_eq!(engine.get_account("Id-102").unwrap().balance(), dec!(3000));
//! ```
//!
//! ## Thread Safety
//!
//! The engine is `Sync`: share it behind an `Arc` and call it from any number
//! of threads. Transfers lock both accounts in a fixed global order, so they
//! never deadlock regardless of direction.

pub mod account;
mod base;
mod config;
mod engine;
pub mod error;
mod lock_registry;
mod notification;
mod store;

pub use account::Account;
pub use base::AccountId;
pub use config::EngineConfig;
pub use engine::TransferEngine;
pub use error::LedgerError;
pub use lock_registry::{AccountLock, LockRegistry};
pub use notification::{LoggingNotificationService, NotificationService};
pub use store::AccountStore;
