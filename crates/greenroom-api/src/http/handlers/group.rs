//! Group management endpoints, scoped to the operator's team.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use greenroom_core::repository::group::GroupRepository;
use greenroom_types::group::{Group, GroupKey};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Length of the human-shareable join code members type into the chat.
const JOIN_CODE_LENGTH: usize = 8;

fn generate_join_code() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(JOIN_CODE_LENGTH)
        .map(char::from)
        .collect();
    code.to_lowercase()
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub name: String,
}

/// GET /api/groups
pub async fn list_groups(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Group>>, AppError> {
    let groups = state.groups.list(&user.team_id).await?;
    Ok(ApiResponse::ok(groups))
}

/// POST /api/groups
///
/// The join code is generated here and returned in the response; it is
/// what the operator hands out to members.
pub async fn create_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<ApiResponse<Group>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let now = Utc::now();
    let group = Group {
        key: GroupKey::new(),
        join_code: generate_join_code(),
        team_id: user.team_id,
        name: request.name,
        deleted: false,
        created_at: now,
        updated_at: now,
    };
    state.groups.create(&group).await?;
    info!(group = %group.key, join_code = %group.join_code, "created group");

    Ok(ApiResponse::ok(group))
}

/// GET /api/groups/{key}
pub async fn get_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<ApiResponse<Group>, AppError> {
    let group = owned_group(&state, &user.team_id, &key).await?;
    Ok(ApiResponse::ok(group))
}

/// PUT /api/groups/{key}
pub async fn rename_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<RenameGroupRequest>,
) -> Result<ApiResponse<Group>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    let mut group = owned_group(&state, &user.team_id, &key).await?;
    state.groups.rename(&group.key, &request.name).await?;
    group.name = request.name;
    Ok(ApiResponse::ok(group))
}

/// DELETE /api/groups/{key}
///
/// Soft delete: practices keep their group reference, members drop out
/// of the group's membership lists.
pub async fn delete_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let group = owned_group(&state, &user.team_id, &key).await?;
    state.groups.soft_delete(&group.key).await?;
    info!(group = %group.key, "soft deleted group");
    Ok(ApiResponse::ok(()))
}

/// Resolve a path key to a live group owned by the caller's team.
/// Everything else, including other teams' groups, is a plain 404.
async fn owned_group(
    state: &AppState,
    team_id: &greenroom_types::team::TeamId,
    raw_key: &str,
) -> Result<Group, AppError> {
    let key: GroupKey = raw_key
        .parse()
        .map_err(|_| AppError::Validation("group key is not a valid id".to_string()))?;
    let group = state.groups.get_by_key(&key).await?.ok_or(AppError::NotFound)?;
    if group.deleted || &group.team_id != team_id {
        return Err(AppError::NotFound);
    }
    Ok(group)
}
