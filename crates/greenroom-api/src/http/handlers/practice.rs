//! Practice scheduling endpoints.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{NaiveDate, NaiveTime, Utc};
use greenroom_core::dialogue::action::{DATE_FORMAT, TIME_FORMAT};
use greenroom_core::repository::group::GroupRepository;
use greenroom_core::repository::place::PlaceRepository;
use greenroom_core::repository::practice::PracticeRepository;
use greenroom_types::group::GroupKey;
use greenroom_types::place::PlaceId;
use greenroom_types::practice::{Practice, PracticeId, PracticeView};
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePracticeRequest {
    pub group_key: String,
    pub place_id: String,
    /// `%Y-%m-%d`
    pub date: String,
    /// `%H:%M`
    pub start: String,
    /// `%H:%M`, optional open-ended practice
    #[serde(default)]
    pub end: Option<String>,
}

/// GET /api/practices/{group_key}
///
/// Full history of a group's practices, not just upcoming ones; the
/// chat list is the upcoming-only view.
pub async fn list_practices(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_key): Path<String>,
) -> Result<ApiResponse<Vec<PracticeView>>, AppError> {
    let key: GroupKey = group_key
        .parse()
        .map_err(|_| AppError::Validation("group key is not a valid id".to_string()))?;
    let group = state.groups.get_by_key(&key).await?.ok_or(AppError::NotFound)?;
    if group.team_id != user.team_id {
        return Err(AppError::NotFound);
    }

    let views = state.practices.list_views(&key, None).await?;
    Ok(ApiResponse::ok(views))
}

/// POST /api/practices
///
/// Enforces the same slot-uniqueness rule as the chat flow: a second
/// practice with the same group, place, date, and start time is a 400.
pub async fn create_practice(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreatePracticeRequest>,
) -> Result<ApiResponse<Practice>, AppError> {
    let group_key: GroupKey = request
        .group_key
        .parse()
        .map_err(|_| AppError::Validation("group key is not a valid id".to_string()))?;
    let place_id: PlaceId = request
        .place_id
        .parse()
        .map_err(|_| AppError::Validation("place id is not a valid id".to_string()))?;
    let date = NaiveDate::parse_from_str(&request.date, DATE_FORMAT)
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".to_string()))?;
    let start = NaiveTime::parse_from_str(&request.start, TIME_FORMAT)
        .map_err(|_| AppError::Validation("start must be HH:MM".to_string()))?;
    let end = match &request.end {
        Some(raw) => Some(
            NaiveTime::parse_from_str(raw, TIME_FORMAT)
                .map_err(|_| AppError::Validation("end must be HH:MM".to_string()))?,
        ),
        None => None,
    };
    if let Some(end) = end {
        if end <= start {
            return Err(AppError::Validation(
                "end must be after start".to_string(),
            ));
        }
    }

    let group = state
        .groups
        .get_by_key(&group_key)
        .await?
        .ok_or(AppError::NotFound)?;
    if group.deleted || group.team_id != user.team_id {
        return Err(AppError::NotFound);
    }
    let place = state.places.get(&place_id).await?.ok_or(AppError::NotFound)?;
    if place.team_id != user.team_id {
        return Err(AppError::NotFound);
    }

    if state
        .practices
        .conflict_exists(&group_key, &place_id, date, start)
        .await?
    {
        return Err(AppError::Validation(
            "a practice with the same group, place, date, and start already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let practice = Practice {
        id: PracticeId::new(),
        group_key,
        place_id,
        date,
        start,
        end,
        deleted: false,
        notified: false,
        created_at: now,
        updated_at: now,
    };
    state.practices.create(&practice).await?;
    info!(practice = %practice.id, group = %practice.group_key, date = %practice.date, "created practice");

    Ok(ApiResponse::ok(practice))
}
