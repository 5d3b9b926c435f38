use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::feedback::models::Feedback;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackDto {
    #[validate(length(max = 255, message = "Subject must not exceed 255 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct FeedbackQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by resolution state
    pub resolved: Option<bool>,
}

impl FeedbackQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: Option<String>,
    pub message: String,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponseDto {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            user_id: feedback.user_id,
            subject: feedback.subject,
            message: feedback.message,
            is_resolved: feedback.is_resolved,
            resolved_at: feedback.resolved_at,
            created_at: feedback.created_at,
        }
    }
}
