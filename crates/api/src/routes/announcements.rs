//! Admin announcement broadcast route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_notifications_created;
use crate::routes::load_user;

use domain::models::notification::CreateAnnouncementRequest;
use domain::models::user::UserRole;

/// Create admin announcement routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/announcements", post(create_announcement))
}

/// Result of a broadcast.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub recipients: u64,
}

/// Broadcast an announcement to every active user.
///
/// POST /api/v1/admin/announcements
#[axum::debug_handler]
async fn create_announcement(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &auth).await?;

    if UserRole::from(user.role) != UserRole::Admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    request.validate()?;

    let repo = NotificationRepository::new(state.pool.clone());
    let recipients = repo
        .broadcast_announcement(&request.title, &request.message, request.priority)
        .await?;

    record_notifications_created(recipients);

    info!(
        admin_id = %user.id,
        recipients = recipients,
        priority = %request.priority,
        "Announcement broadcast"
    );

    Ok((
        StatusCode::CREATED,
        Json(AnnouncementResponse { recipients }),
    ))
}
