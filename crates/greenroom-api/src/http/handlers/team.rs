//! Team (troupe) endpoints.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use greenroom_core::repository::team::TeamRepository;
use greenroom_types::team::{Team, TeamId};
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// POST /teams
///
/// Open bootstrap endpoint: a team must exist before any user can be
/// registered against it, so this one cannot sit behind the token
/// guard.
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<ApiResponse<Team>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let now = Utc::now();
    let team = Team {
        id: TeamId::new(),
        name: request.name,
        address: request.address,
        image_url: request.image_url,
        created_at: now,
        updated_at: now,
    };
    state.teams.create(&team).await?;
    info!(team = %team.id, "created team");

    Ok(ApiResponse::ok(team))
}

/// GET /api/teams/{id}
///
/// Operators can only read their own team.
pub async fn get_team(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Team>, AppError> {
    let id: TeamId = id
        .parse()
        .map_err(|_| AppError::Validation("team id is not a valid id".to_string()))?;
    if id != user.team_id {
        return Err(AppError::NotFound);
    }
    let team = state.teams.get(&id).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(team))
}
