//! API operator registration.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use greenroom_core::repository::team::TeamRepository;
use greenroom_core::repository::user::UserRepository;
use greenroom_types::team::TeamId;
use greenroom_types::user::{User, UserId};
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: String,
    pub display_name: String,
    pub team_id: String,
    #[serde(default)]
    pub admin: bool,
}

/// POST /users
///
/// Open endpoint: registration binds the operator to an existing team,
/// and the token only arrives through a later /login call.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<ApiResponse<User>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    let team_id: TeamId = request
        .team_id
        .parse()
        .map_err(|_| AppError::Validation("team_id is not a valid id".to_string()))?;
    if state.teams.get(&team_id).await?.is_none() {
        return Err(AppError::Validation("unknown team".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: UserId::from(request.user_id),
        display_name: request.display_name,
        team_id,
        admin: request.admin,
        enabled: true,
        deleted: false,
        created_at: now,
        updated_at: now,
    };
    state.users.create(&user).await?;
    info!(user = %user.id, team = %user.team_id, "registered api user");

    Ok(ApiResponse::ok(user))
}
