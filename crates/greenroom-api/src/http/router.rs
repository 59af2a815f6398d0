//! Axum router configuration with middleware.
//!
//! Three route groups: the open entry points (webhook, login,
//! bootstrap registration, scheduler hook), the token-guarded
//! management API under `/api/`, and /health.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Token-guarded management API: every handler takes an AuthUser.
    let api_routes = Router::new()
        .route(
            "/groups",
            get(handlers::group::list_groups).post(handlers::group::create_group),
        )
        .route(
            "/groups/{key}",
            get(handlers::group::get_group)
                .put(handlers::group::rename_group)
                .delete(handlers::group::delete_group),
        )
        .route(
            "/places",
            get(handlers::place::list_places).post(handlers::place::create_place),
        )
        .route("/places/{id}", get(handlers::place::get_place))
        .route("/practices", post(handlers::practice::create_practice))
        .route(
            "/practices/{group_key}",
            get(handlers::practice::list_practices),
        )
        .route("/teams/{id}", get(handlers::team::get_team));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        // Bootstrap and login (no token yet at this point)
        .route("/teams", post(handlers::team::create_team))
        .route("/users", post(handlers::user::create_user))
        .route("/login", post(handlers::auth::login))
        // Chat account administration (token-guarded via AuthUser)
        .route("/accounts", post(handlers::account::create_account))
        .route("/accounts/{id}", delete(handlers::account::delete_account))
        // Platform-facing entry points, authenticated by signature
        // (webhook) or network placement (scheduler)
        .route("/webhook/line", post(handlers::webhook::line_webhook))
        .route(
            "/scheduled/daily_notification",
            post(handlers::scheduled::daily_notification),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
