//! Bearer-token authentication extractor.
//!
//! `/api/*` handlers take an [`AuthUser`] argument; extracting it
//! validates the `Authorization: Bearer <token>` header against the
//! SHA-256 token hashes stored on `users` and yields the operator, so
//! handlers can scope queries to the operator's team.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use greenroom_core::repository::user::UserRepository;
use greenroom_infra::token::token_hash;
use greenroom_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated API operator.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let user = state
            .users
            .find_by_token_hash(&token_hash(&token))
            .await
            .map_err(AppError::Repository)?;

        match user {
            Some(user) => Ok(AuthUser(user)),
            None => Err(AppError::Unauthorized(
                "invalid or expired token".to_string(),
            )),
        }
    }
}

fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Unauthorized(
            "missing Authorization header".to_string(),
        ));
    };
    let auth = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid Authorization header".to_string()))?;
    match auth.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized(
            "expected 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}
