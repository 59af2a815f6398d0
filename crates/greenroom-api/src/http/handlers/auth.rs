//! Login: exchange a user id for a fresh bearer token.

use axum::Json;
use axum::extract::State;
use greenroom_core::repository::user::UserRepository;
use greenroom_infra::token::{generate_token, token_hash};
use greenroom_types::user::UserId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Shown once; only its hash is stored.
    pub token: String,
}

/// POST /login
///
/// Issues a new bearer token for an enabled operator, invalidating any
/// previously issued one (a user has a single token hash).
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let user = state.users.get(&UserId::from(request.user_id)).await?;
    let Some(user) = user else {
        return Err(AppError::Unauthorized("unknown user".to_string()));
    };
    if !user.enabled || user.deleted {
        return Err(AppError::Unauthorized("user is disabled".to_string()));
    }

    let token = generate_token();
    state.users.set_token_hash(&user.id, &token_hash(&token)).await?;
    info!(user = %user.id, "issued api token");

    Ok(ApiResponse::ok(LoginResponse { token }))
}
