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

//! Transfer notifications.

use crate::account::Account;

/// Outbound port notified once per side of every successful transfer.
///
/// Called synchronously while the transfer still holds both account locks, so
/// implementations should return quickly. Delivery is best-effort: the engine
/// never rolls back a transfer because of a notification.
pub trait NotificationService: Send + Sync {
    fn notify_about_transfer(&self, account: &Account, message: &str);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationService;

impl NotificationService for LoggingNotificationService {
    fn notify_about_transfer(&self, account: &Account, message: &str) {
        tracing::info!(
            account_id = %account.id(),
            balance = %account.balance(),
            "sending notification: {}",
            message
        );
    }
}
