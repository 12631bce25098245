//! Team management routes.
//!
//! Admin-only: list members, edit a member's profile or role, and remove
//! members. An admin cannot demote or remove themselves, so the team always
//! keeps at least one admin able to log in.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;
use tracing::info;

use construct_core::{Email, Role, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// Build the team router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/team", get(list))
        .route("/team/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    email: String,
    name: String,
    role: Role,
}

/// List all users.
async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Update a member's name, email, or role.
async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<User>, AppError> {
    let email = Email::parse(&request.email).map_err(|e| AppError::Validation(e.to_string()))?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    if id == admin.id && request.role != Role::Admin {
        return Err(AppError::Validation(
            "You cannot remove your own admin role".to_string(),
        ));
    }

    let user = UserRepository::new(state.pool())
        .update_profile(id, &email, name, request.role)
        .await?;

    info!(user_id = %user.id, updated_by = %admin.id, "team member updated");

    Ok(Json(user))
}

/// Remove a member.
async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>, AppError> {
    if id == admin.id {
        return Err(AppError::Validation(
            "You cannot remove your own account".to_string(),
        ));
    }

    let deleted = UserRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("User".to_string()));
    }

    info!(user_id = %id, removed_by = %admin.id, "team member removed");

    Ok(Json(serde_json::json!({ "message": "User removed" })))
}
