//! Invitation routes.
//!
//! Admins issue invitations; the token lookup is public so the registration
//! page can show who the invitation is for before an account exists.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use construct_core::{Email, Role};

use crate::db::InvitationRepository;
use crate::error::{AppError, set_sentry_user};
use crate::middleware::RequireAdmin;
use crate::middleware::auth::set_current_user;
use crate::models::{CurrentUser, Invitation};
use crate::services::{AuthService, InviteService};
use crate::state::AppState;

/// Build the invitations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invitations", get(list).post(create))
        .route("/invitations/{token}", get(show))
        .route("/invitations/{token}/accept", post(accept))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    email: String,
    name: String,
    #[serde(default)]
    role: Option<Role>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedResponse {
    #[serde(flatten)]
    invitation: Invitation,
    email_sent: bool,
}

/// Public view of an invitation, shown on the registration page.
#[derive(Debug, Serialize)]
struct PublicInvitation {
    email: String,
    name: String,
    role: Role,
}

impl From<&Invitation> for PublicInvitation {
    fn from(invitation: &Invitation) -> Self {
        Self {
            email: invitation.email.as_str().to_string(),
            name: invitation.name.clone(),
            role: invitation.role,
        }
    }
}

/// Issue an invitation and send the invitation email.
async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let email = Email::parse(&request.email).map_err(|e| AppError::Validation(e.to_string()))?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let role = request.role.unwrap_or(Role::User);
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let service = InviteService::new(state.pool(), state.email(), &state.config().base_url);
    let (invitation, email_sent) = service.create(&email, name, role, message).await?;

    info!(
        invitation_id = %invitation.id,
        invited_by = %admin.id,
        email_sent,
        "invitation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            invitation,
            email_sent,
        }),
    ))
}

/// List all invitations.
async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Invitation>>, AppError> {
    let invitations = InvitationRepository::new(state.pool()).list_all().await?;
    Ok(Json(invitations))
}

/// Look up an invitation by token.
///
/// Returns 404 for unknown tokens, 400 for already-used invitations, and
/// 410 for expired ones.
async fn show(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicInvitation>, AppError> {
    let invitation = InvitationRepository::new(state.pool())
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation".to_string()))?;

    if invitation.is_accepted() {
        return Err(AppError::Validation(
            "Invitation has already been used".to_string(),
        ));
    }
    if invitation.is_expired() {
        return Err(AppError::Gone("Invitation has expired".to_string()));
    }

    Ok(Json(PublicInvitation::from(&invitation)))
}

#[derive(Debug, Deserialize)]
struct AcceptRequest {
    password: String,
}

/// Accept an invitation, creating the account and logging it in.
///
/// Equivalent to `POST /auth/register` with this token in the body; kept so
/// the invitation link can be acted on directly.
async fn accept(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
    Json(request): Json<AcceptRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = AuthService::new(state.pool())
        .register_with_invitation(&token, &request.password)
        .await?;

    info!(user_id = %user.id, "invitation accepted");

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(user.id.as_i32(), user.email.as_str());

    Ok(Json(serde_json::json!({
        "message": "Invitation accepted",
        "userId": user.id,
    })))
}
