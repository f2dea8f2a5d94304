//! Notification route handlers.
//!
//! The read side of the notification fan-out. A notification is only
//! ever visible to the user it targets; the mark-as-read update is
//! scoped to the target's email so ids cannot be probed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use persistence::entities::NotificationEntity;
use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::load_user;

use domain::models::notification::{NotificationResponse, UnreadCountResponse};

/// Create notification routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", post(mark_read))
}

fn to_response(entity: NotificationEntity) -> NotificationResponse {
    NotificationResponse {
        id: entity.id,
        title: entity.title,
        message: entity.message,
        notification_type: entity.notification_type.into(),
        priority: entity.priority.into(),
        is_read: entity.read,
        request_id: entity.request_id,
        created_at: entity.created_at,
    }
}

#[derive(Debug, Deserialize)]
struct NotificationListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_per_page")]
    per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// List the caller's notifications, newest first.
///
/// GET /api/v1/notifications
#[axum::debug_handler]
async fn list_notifications(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &auth).await?;
    let repo = NotificationRepository::new(state.pool.clone());

    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, state.config.limits.max_per_page);
    let offset = (page - 1) * per_page;

    let entities = repo.list_for_email(&user.email, per_page, offset).await?;
    let notifications: Vec<NotificationResponse> = entities.into_iter().map(to_response).collect();

    Ok((StatusCode::OK, Json(notifications)))
}

/// Count the caller's unread notifications.
///
/// GET /api/v1/notifications/unread-count
#[axum::debug_handler]
async fn unread_count(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &auth).await?;
    let repo = NotificationRepository::new(state.pool.clone());

    let unread = repo.unread_count(&user.email).await?;

    Ok((StatusCode::OK, Json(UnreadCountResponse { unread })))
}

/// Mark one of the caller's notifications as read.
///
/// POST /api/v1/notifications/{id}/read
#[axum::debug_handler]
async fn mark_read(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &auth).await?;
    let repo = NotificationRepository::new(state.pool.clone());

    // Someone else's notification id behaves like a missing one
    let entity = repo
        .mark_read(id, &user.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    info!(notification_id = %id, user_id = %user.id, "Notification marked read");

    Ok((StatusCode::OK, Json(to_response(entity))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_creation() {
        let _router: Router<AppState> = router();
    }
}
