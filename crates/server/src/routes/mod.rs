//! HTTP route handlers.

pub mod auth;
pub mod chat;
pub mod conversations;
pub mod dashboard;
pub mod gpts;
pub mod invitations;
pub mod storage;
pub mod team;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(health_ready))
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(gpts::router())
                .merge(conversations::router())
                .merge(invitations::router())
                .merge(storage::router())
                .merge(chat::router())
                .merge(team::router())
                .merge(dashboard::router()),
        )
}

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}

/// Readiness probe: verifies database connectivity.
async fn health_ready(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<&'static str, axum::http::StatusCode> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|_| axum::http::StatusCode::SERVICE_UNAVAILABLE)?;
    Ok("READY")
}
