use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{validation_message, AppJson};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::Principal;
use crate::features::notifications::dtos::{
    NotificationQueryParams, NotificationResponseDto, SendNotificationDto,
    SendNotificationResponseDto, UnreadCountDto,
};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::{ApiResponse, Meta};

/// List notifications
///
/// Users get their own notifications. The admin gets all of them and may
/// filter by `user_id`.
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQueryParams),
    responses(
        (status = 200, description = "List of notifications", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    principal: Principal,
    State(service): State<Arc<NotificationService>>,
    Query(params): Query<NotificationQueryParams>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let (notifications, total) = service.list(&principal, &params).await?;
    let items = notifications
        .into_iter()
        .map(NotificationResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Count unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = ApiResponse<UnreadCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn unread_count(
    principal: Principal,
    State(service): State<Arc<NotificationService>>,
) -> Result<Json<ApiResponse<UnreadCountDto>>> {
    let count = service.unread_count(&principal).await?;
    Ok(Json(ApiResponse::success(
        Some(UnreadCountDto { count }),
        None,
        None,
    )))
}

/// Mark a notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<NotificationResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_read(
    principal: Principal,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponseDto>>> {
    let notification = service.mark_read(&principal, id).await?;
    Ok(Json(ApiResponse::success(
        Some(notification.into()),
        None,
        None,
    )))
}

/// Send a notification to explicit users or to owners of matching reports
#[utoipa::path(
    post,
    path = "/api/admin/notifications/send",
    request_body = SendNotificationDto,
    responses(
        (status = 201, description = "Notifications created", body = ApiResponse<SendNotificationResponseDto>),
        (status = 400, description = "Validation error or empty audience"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<SendNotificationDto>,
) -> Result<(StatusCode, Json<ApiResponse<SendNotificationResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let notifications = service.send(dto).await?;
    tracing::info!("Admin {} sent {} notifications", admin.email, notifications.len());

    let body = SendNotificationResponseDto {
        count: notifications.len(),
        notifications: notifications
            .into_iter()
            .map(NotificationResponseDto::from)
            .collect(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(body),
            Some("Notifications sent".to_string()),
            None,
        )),
    ))
}
