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

//! HTTP request layer over the transfer engine.
//!
//! Shared by the `server` example and the HTTP integration tests. Boundary
//! validation (non-empty IDs, non-negative opening balance) happens here; the
//! engine still enforces its own rules, including the `amount > 0` check.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use ledger_transfer_rs::{Account, AccountId, LedgerError, TransferEngine};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use std::sync::Arc;

// === Request/Response DTOs ===

/// Request body for opening an account.
///
/// ```json
/// {"accountId": "Id-123", "balance": 1000}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub account_id: String,
    #[serde(deserialize_with = "decimal_from_number_or_string")]
    pub balance: Decimal,
}

/// Request body for a transfer.
///
/// ```json
/// {"fromAccountId": "Id-101", "toAccountId": "Id-102", "amount": 1000}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    #[serde(deserialize_with = "decimal_from_number_or_string")]
    pub amount: Decimal,
}

/// JSON money value: either a number (`1000`, `0.5`) or a string (`"1000"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts both numeric and string amounts.
///
/// Floats are parsed from their shortest decimal rendering, so `0.1` becomes
/// exactly `0.1`.
fn decimal_from_number_or_string<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match DecimalInput::deserialize(deserializer)? {
        DecimalInput::Integer(value) => return Ok(Decimal::from(value)),
        DecimalInput::Float(value) => value.to_string(),
        DecimalInput::Text(value) => value,
    };
    Decimal::from_str(text.trim())
        .or_else(|_| Decimal::from_scientific(text.trim()))
        .map_err(serde::de::Error::custom)
}

/// Response body for errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the transfer engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
}

// === Error Handling ===

/// Errors a handler can return.
pub enum AppError {
    Ledger(LedgerError),
    /// The blocking transfer task panicked or was cancelled.
    Internal(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Ledger(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self {
            AppError::Ledger(err) => err,
            AppError::Internal(message) => {
                tracing::error!(error = %message, "transfer task failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: message,
                        code: "INTERNAL_ERROR".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        let (status, code) = match &err {
            LedgerError::DuplicateAccountId(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_ACCOUNT_ID"),
            LedgerError::InvalidAccountId => (StatusCode::BAD_REQUEST, "INVALID_ACCOUNT_ID"),
            LedgerError::NegativeBalance => (StatusCode::BAD_REQUEST, "NEGATIVE_BALANCE"),
            LedgerError::NegativeOrZeroAmount => {
                (StatusCode::BAD_REQUEST, "NEGATIVE_OR_ZERO_AMOUNT")
            }
            LedgerError::AccountNotFound(_) => (StatusCode::BAD_REQUEST, "ACCOUNT_NOT_FOUND"),
            LedgerError::InsufficientBalance { .. } => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_BALANCE")
            }
            LedgerError::LockTimeout(_) => (StatusCode::SERVICE_UNAVAILABLE, "LOCK_TIMEOUT"),
        };

        (
            status,
            Json(ErrorResponse {
                error: err.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /v1/accounts - Open a new account.
async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<StatusCode, AppError> {
    let account_id = AccountId(request.account_id);
    if account_id.is_blank() {
        return Err(LedgerError::InvalidAccountId.into());
    }
    if request.balance < Decimal::ZERO {
        return Err(LedgerError::NegativeBalance.into());
    }

    state.engine.create_account(account_id, request.balance)?;
    Ok(StatusCode::CREATED)
}

/// GET /v1/accounts/{id} - Get account by ID.
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, (StatusCode, Json<ErrorResponse>)> {
    state.engine.get_account(&id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: LedgerError::AccountNotFound(AccountId(id)).to_string(),
                code: "ACCOUNT_NOT_FOUND".to_string(),
            }),
        )
    })
}

/// GET /v1/accounts - List all accounts.
async fn list_accounts(State(state): State<AppState>) -> Json<Vec<Account>> {
    let mut accounts = state.engine.list_accounts();
    accounts.sort_by(|a, b| a.id().cmp(b.id()));
    Json(accounts)
}

/// DELETE /v1/accounts - Remove every account.
async fn reset_accounts(State(state): State<AppState>) -> StatusCode {
    state.engine.reset_all_accounts();
    StatusCode::NO_CONTENT
}

/// POST /v1/accounts/transfer-amount - Move funds between two accounts.
///
/// The engine blocks on account locks, so the transfer runs on the blocking
/// thread pool and never stalls an async worker.
async fn transfer_amount(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<StatusCode, AppError> {
    let from = AccountId(request.from_account_id);
    let to = AccountId(request.to_account_id);
    if from.is_blank() || to.is_blank() {
        return Err(LedgerError::InvalidAccountId.into());
    }

    let engine = Arc::clone(&state.engine);
    let amount = request.amount;
    tokio::task::spawn_blocking(move || engine.transfer(&from, &to, amount)).await??;
    Ok(StatusCode::OK)
}

// === Router ===

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/accounts",
            post(create_account).get(list_accounts).delete(reset_accounts),
        )
        .route("/v1/accounts/transfer-amount", post(transfer_amount))
        .route("/v1/accounts/{id}", get(get_account))
        .with_state(state)
}
