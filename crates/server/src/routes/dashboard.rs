//! Dashboard metrics routes.

use axum::{Json, Router, extract::State, routing::get};
use futures::try_join;
use serde::Serialize;

use crate::db::{ConversationRepository, GptRepository, InvitationRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/metrics", get(metrics))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Metrics {
    total_users: i64,
    total_gpts: i64,
    total_conversations: i64,
    pending_invitations: i64,
}

/// Aggregate counts for the admin dashboard.
async fn metrics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Metrics>, AppError> {
    let pool = state.pool();

    let users = UserRepository::new(pool);
    let gpts = GptRepository::new(pool);
    let conversations = ConversationRepository::new(pool);
    let invitations = InvitationRepository::new(pool);

    let (total_users, total_gpts, total_conversations, pending_invitations) = try_join!(
        users.count(),
        gpts.count(),
        conversations.count(),
        invitations.count_pending(),
    )?;

    Ok(Json(Metrics {
        total_users,
        total_gpts,
        total_conversations,
        pending_invitations,
    }))
}
