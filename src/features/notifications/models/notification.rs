use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema, Default)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    #[default]
    System,
    ReportStatus,
    Reminder,
    ZoneAlert,
}

/// How a notification reaches the user. Email is accepted but not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema, Default)]
#[sqlx(type_name = "delivery_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    #[default]
    InApp,
    InAppEmail,
}

#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub zone_name: Option<String>,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub delivery_method: DeliveryMethod,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_strings() {
        assert_eq!(
            serde_json::to_string(&NotificationType::ReportStatus).unwrap(),
            "\"REPORT_STATUS\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationType::ZoneAlert).unwrap(),
            "\"ZONE_ALERT\""
        );
        assert_eq!(
            serde_json::to_string(&DeliveryMethod::InAppEmail).unwrap(),
            "\"IN_APP_EMAIL\""
        );
    }
}
