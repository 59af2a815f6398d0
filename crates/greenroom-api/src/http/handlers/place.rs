//! Venue management endpoints, scoped to the operator's team.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use greenroom_core::repository::place::PlaceRepository;
use greenroom_types::place::{Place, PlaceId};
use serde::Deserialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaceRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// GET /api/places
pub async fn list_places(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Place>>, AppError> {
    let places = state.places.list(&user.team_id).await?;
    Ok(ApiResponse::ok(places))
}

/// POST /api/places
pub async fn create_place(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreatePlaceRequest>,
) -> Result<ApiResponse<Place>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let now = Utc::now();
    let place = Place {
        id: PlaceId::new(),
        team_id: user.team_id,
        name: request.name,
        address: request.address,
        image_url: request.image_url,
        created_at: now,
        updated_at: now,
    };
    state.places.create(&place).await?;
    info!(place = %place.id, "created place");

    Ok(ApiResponse::ok(place))
}

/// GET /api/places/{id}
pub async fn get_place(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Place>, AppError> {
    let id: PlaceId = id
        .parse()
        .map_err(|_| AppError::Validation("place id is not a valid id".to_string()))?;
    let place = state.places.get(&id).await?.ok_or(AppError::NotFound)?;
    if place.team_id != user.team_id {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::ok(place))
}
