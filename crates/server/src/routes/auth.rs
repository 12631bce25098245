//! Authentication routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    token: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: i32,
    email: String,
    name: String,
    role: construct_core::Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i32(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

impl From<&CurrentUser> for UserResponse {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id.as_i32(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Register a new account by accepting an invitation token.
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .register_with_invitation(&request.token, &request.password)
        .await?;

    info!(user_id = %user.id, "user registered via invitation");

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(user.id.as_i32(), user.email.as_str());

    Ok(Json(UserResponse::from(&user)))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await?;

    // Rotate the session ID on privilege change
    session.cycle_id().await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(user.id.as_i32(), user.email.as_str());

    info!(user_id = %user.id, "user logged in");

    Ok(Json(UserResponse::from(&user)))
}

/// Log out and destroy the session.
async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    clear_current_user(&session).await?;
    session.flush().await?;
    clear_sentry_user();

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// Return the currently authenticated user.
async fn me(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
