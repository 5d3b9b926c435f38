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
use crate::features::auth::guards::{RequireAdmin, RequireUser};
use crate::features::feedback::dtos::{
    CreateFeedbackDto, FeedbackQueryParams, FeedbackResponseDto,
};
use crate::features::feedback::services::FeedbackService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Submit feedback
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackDto,
    responses(
        (status = 201, description = "Feedback submitted", body = ApiResponse<FeedbackResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a user account")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn create_feedback(
    RequireUser(user): RequireUser,
    State(service): State<Arc<FeedbackService>>,
    AppJson(dto): AppJson<CreateFeedbackDto>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let feedback = service.create(user.id, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(FeedbackResponseDto::from(feedback)),
            Some("Thank you for your feedback".to_string()),
            None,
        )),
    ))
}

/// List the caller's feedback (newest first)
#[utoipa::path(
    get,
    path = "/api/feedback",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of feedback", body = ApiResponse<Vec<FeedbackResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a user account")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn list_my_feedback(
    RequireUser(user): RequireUser,
    State(service): State<Arc<FeedbackService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackResponseDto>>>> {
    let (items, total) = service.list_by_user(user.id, &params).await?;

    Ok(Json(ApiResponse::success(
        Some(items.into_iter().map(FeedbackResponseDto::from).collect()),
        None,
        Some(Meta { total }),
    )))
}

/// List all feedback
#[utoipa::path(
    get,
    path = "/api/admin/feedback",
    params(FeedbackQueryParams),
    responses(
        (status = 200, description = "List of feedback", body = ApiResponse<Vec<FeedbackResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn list_feedback(
    _admin: RequireAdmin,
    State(service): State<Arc<FeedbackService>>,
    Query(params): Query<FeedbackQueryParams>,
) -> Result<Json<ApiResponse<Vec<FeedbackResponseDto>>>> {
    let (items, total) = service.list(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items.into_iter().map(FeedbackResponseDto::from).collect()),
        None,
        Some(Meta { total }),
    )))
}

/// Mark feedback as resolved
#[utoipa::path(
    patch,
    path = "/api/admin/feedback/{id}/resolve",
    params(
        ("id" = Uuid, Path, description = "Feedback ID")
    ),
    responses(
        (status = 200, description = "Feedback resolved", body = ApiResponse<FeedbackResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Feedback not found")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn resolve_feedback(
    _admin: RequireAdmin,
    State(service): State<Arc<FeedbackService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FeedbackResponseDto>>> {
    let feedback = service.resolve(id).await?;

    Ok(Json(ApiResponse::success(
        Some(FeedbackResponseDto::from(feedback)),
        Some("Feedback resolved".to_string()),
        None,
    )))
}
