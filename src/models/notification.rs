// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::crud::{Resource, TenantScoped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    MaintenanceReminder,
    QuotationUpdate,
    Payment,
    System,
    Promotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_channel", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Read,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub garage_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Revisão agendada")]
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub channel: NotificationChannel,
    pub status: NotificationStatus,
    pub read_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Notification {
    const TABLE: &'static str = "notifications";
    const ENTITY: &'static str = "Notification";
}

impl TenantScoped for Notification {
    fn garage_id(&self) -> Uuid {
        self.garage_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Destinatário; padrão: o próprio chamador.
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "required"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "required"))]
    pub message: String,

    pub notification_type: NotificationType,

    #[serde(default = "default_channel")]
    pub channel: NotificationChannel,
}

fn default_channel() -> NotificationChannel {
    NotificationChannel::InApp
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn channel_defaults_to_in_app() {
        let payload: NotificationPayload = serde_json::from_value(json!({
            "title": "Oi",
            "message": "Seu carro está pronto",
            "notificationType": "SYSTEM"
        }))
        .unwrap();

        assert_eq!(payload.channel, NotificationChannel::InApp);
        assert!(payload.user_id.is_none());
    }

    #[test]
    fn free_text_status_is_rejected() {
        assert!(serde_json::from_str::<NotificationStatus>("\"DELIVERED\"").is_err());
    }
}
