use sqlx::PgExecutor;

use crate::error::ApiError;
use crate::notifications::{NewNotification, Notification};

const NOTIFICATION_COLUMNS: &str = "id, kind, source_table, source_id, title, detail, read, created_at";

/// Append a notification row
pub async fn create<'e, E>(executor: E, event: &NewNotification) -> Result<Notification, ApiError>
where
    E: PgExecutor<'e>,
{
    let notification = sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications (kind, source_table, source_id, title, detail)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(event.kind)
    .bind(event.source_table)
    .bind(event.source_id)
    .bind(&event.title)
    .bind(&event.detail)
    .fetch_one(executor)
    .await?;

    tracing::debug!(
        "Recorded {} notification for {} {}",
        event.kind,
        event.source_table,
        event.source_id
    );
    Ok(notification)
}

/// Newest notifications first, optionally only unread ones
pub async fn list<'e, E>(executor: E, unread_only: bool, limit: i64) -> Result<Vec<Notification>, ApiError>
where
    E: PgExecutor<'e>,
{
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        r#"
        SELECT {}
        FROM notifications
        WHERE ($1 = FALSE OR read = FALSE)
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(unread_only)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(notifications)
}

/// Notifications about one entity, oldest first
pub async fn find_by_source<'e, E>(
    executor: E,
    source_table: &str,
    source_id: i32,
) -> Result<Vec<Notification>, ApiError>
where
    E: PgExecutor<'e>,
{
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {} FROM notifications WHERE source_table = $1 AND source_id = $2 ORDER BY id",
        NOTIFICATION_COLUMNS
    ))
    .bind(source_table)
    .bind(source_id)
    .fetch_all(executor)
    .await?;

    Ok(notifications)
}

/// Set the read flag; None when the notification does not exist
pub async fn mark_read<'e, E>(executor: E, id: i32) -> Result<Option<Notification>, ApiError>
where
    E: PgExecutor<'e>,
{
    let notification = sqlx::query_as::<_, Notification>(&format!(
        "UPDATE notifications SET read = TRUE WHERE id = $1 RETURNING {}",
        NOTIFICATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(notification)
}
