use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::notifications::models::{DeliveryMethod, Notification, NotificationType};
use crate::features::reports::models::ReportStatus;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

/// Request DTO for sending notifications.
///
/// A non-empty `userIds` targets exactly those users. Otherwise the audience
/// is every owner of a report matching the zone, status and date criteria.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub message: String,

    #[serde(default)]
    pub notification_type: NotificationType,

    #[serde(default)]
    pub delivery_method: DeliveryMethod,

    #[serde(default)]
    pub user_ids: Vec<Uuid>,

    pub zone_id: Option<Uuid>,

    pub status: Option<ReportStatus>,

    /// Inclusive start date (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD), covers the whole day
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseDto {
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

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            report_id: n.report_id,
            zone_id: n.zone_id,
            zone_name: n.zone_name,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            delivery_method: n.delivery_method,
            is_read: n.is_read,
            read_at: n.read_at,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponseDto {
    pub count: usize,
    pub notifications: Vec<NotificationResponseDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountDto {
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NotificationQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by recipient (admin only, ignored for users)
    pub user_id: Option<Uuid>,
    /// Only unread notifications
    pub unread_only: Option<bool>,
}

impl NotificationQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
