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

//! REST API server exposing the transfer engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example server
//! ```
//!
//! # Endpoints
//!
//! ```bash
//! # Open accounts
//! curl -X POST http://localhost:3000/v1/accounts \
//!   -H "Content-Type: application/json" \
//!   -d '{"accountId": "Id-101", "balance": "5000"}'
//! curl -X POST http://localhost:3000/v1/accounts \
//!   -H "Content-Type: application/json" \
//!   -d '{"accountId": "Id-102", "balance": "2000"}'
//!
//! # Transfer
//! curl -X POST http://localhost:3000/v1/accounts/transfer-amount \
//!   -H "Content-Type: application/json" \
//!   -d '{"fromAccountId": "Id-101", "toAccountId": "Id-102", "amount": "1000"}'
//!
//! # Get account
//! curl http://localhost:3000/v1/accounts/Id-101
//!
//! # List all accounts
//! curl http://localhost:3000/v1/accounts
//!
//! # Reset
//! curl -X DELETE http://localhost:3000/v1/accounts
//! ```

mod api;

use api::{AppState, create_router};
use ledger_transfer_rs::TransferEngine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState {
        engine: Arc::new(TransferEngine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Ledger API server running on http://127.0.0.1:3000");
    tracing::info!("  POST   /v1/accounts                  - Open an account");
    tracing::info!("  GET    /v1/accounts                  - List all accounts");
    tracing::info!("  GET    /v1/accounts/{{id}}             - Get account by ID");
    tracing::info!("  POST   /v1/accounts/transfer-amount  - Transfer between accounts");
    tracing::info!("  DELETE /v1/accounts                  - Reset all accounts");

    axum::serve(listener, app).await
}
