use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// What happened, as a stable tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    QuoteCreated,
    QuoteConverted,
    QuoteStatusChanged,
    OrderCreated,
    PaymentPreferenceCreated,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::QuoteCreated => "quote_created",
            NotificationKind::QuoteConverted => "quote_converted",
            NotificationKind::QuoteStatusChanged => "quote_status_changed",
            NotificationKind::OrderCreated => "order_created",
            NotificationKind::PaymentPreferenceCreated => "payment_preference_created",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted notification row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub kind: NotificationKind,
    /// Table of the entity the notification is about
    #[schema(example = "quotes")]
    pub source_table: String,
    pub source_id: i32,
    pub title: String,
    pub detail: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Event handed to the notification sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub source_table: &'static str,
    pub source_id: i32,
    pub title: String,
    pub detail: String,
}

/// Query parameters for GET /crm/notifications
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;
pub const MAX_NOTIFICATION_LIMIT: i64 = 200;

impl NotificationQuery {
    /// Effective limit, rejecting values outside 1..=MAX_NOTIFICATION_LIMIT
    pub fn limit(&self) -> Result<i64, String> {
        match self.limit {
            None => Ok(DEFAULT_NOTIFICATION_LIMIT),
            Some(l) if (1..=MAX_NOTIFICATION_LIMIT).contains(&l) => Ok(l),
            Some(l) => Err(format!(
                "limit must be between 1 and {}, got {}",
                MAX_NOTIFICATION_LIMIT, l
            )),
        }
    }
}
