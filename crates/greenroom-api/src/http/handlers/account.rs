//! Chat account administration.
//!
//! Accounts normally come and go through follow/unfollow webhook
//! events; these endpoints exist for support work (re-seeding a lost
//! account, purging a tester).

use axum::Json;
use axum::extract::{Path, State};
use greenroom_core::repository::account::AccountRepository;
use greenroom_types::account::{Account, AccountId};
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub account_id: String,
}

/// POST /accounts
pub async fn create_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<ApiResponse<Account>, AppError> {
    if request.account_id.trim().is_empty() {
        return Err(AppError::Validation(
            "account_id must not be empty".to_string(),
        ));
    }
    let id = AccountId::from(request.account_id);
    state.accounts.create(&id).await?;
    info!(account = %id, by = %user.id, "created account");

    let account = state.accounts.get(&id).await?.ok_or(AppError::Internal(
        "account vanished right after creation".to_string(),
    ))?;
    Ok(ApiResponse::ok(account))
}

/// DELETE /accounts/{id}
pub async fn delete_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = AccountId::from(id);
    state.accounts.delete(&id).await?;
    info!(account = %id, by = %user.id, "deleted account");
    Ok(ApiResponse::ok(()))
}
