// HTTP handlers for CRM notification readout

use axum::extract::State;

use crate::error::ApiError;
use crate::extract::{AppPath, AppQuery};
use crate::notifications::{repository, Notification, NotificationQuery};
use crate::response::ApiResponse;
use crate::AppState;

/// Handler for GET /crm/notifications
#[utoipa::path(
    get,
    path = "/crm/notifications",
    params(
        ("unread_only" = Option<bool>, Query, description = "Only unread notifications"),
        ("limit" = Option<i64>, Query, description = "Maximum rows (1-200, default 50)")
    ),
    responses((status = 200, description = "Newest notifications first", body = [Notification])),
    tag = "notifications"
)]
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NotificationQuery>,
) -> Result<ApiResponse<Vec<Notification>>, ApiError> {
    let limit = query.limit().map_err(ApiError::BadRequest)?;
    let notifications = repository::list(&state.db, query.unread_only, limit).await?;
    Ok(ApiResponse::new(notifications))
}

/// Handler for PATCH /crm/notifications/:id/read
#[utoipa::path(
    patch,
    path = "/crm/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Notification>, ApiError> {
    let notification = repository::mark_read(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification", id))?;

    Ok(ApiResponse::new(notification))
}
