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
use crate::features::reports::dtos::{
    CreateReportDto, ReportQueryParams, ReportResponseDto, UpdateStatusDto,
};
use crate::features::reports::models::StatusChange;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

// ==================== Citizen ====================

/// Submit a waste report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid weights, inactive zone or place"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a user account"),
        (status = 404, description = "Zone or place not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    RequireUser(user): RequireUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let (report, profile) = service.create(user.id, dto).await?;
    let body = ReportResponseDto::from(report).with_generator(profile);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(body),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List the caller's reports (newest first)
#[utoipa::path(
    get,
    path = "/api/reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a user account")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn list_my_reports(
    RequireUser(user): RequireUser,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list_by_user(user.id, &params).await?;
    let items = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get one of the caller's reports
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn get_my_report(
    RequireUser(user): RequireUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let (report, profile) = service.get_for_user(user.id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportResponseDto::from(report).with_generator(profile)),
        None,
        None,
    )))
}

// ==================== Admin ====================

/// List all reports with filters (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&params).await?;
    let items = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get any report by ID
#[utoipa::path(
    get,
    path = "/api/admin/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let (report, profile) = service.get(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportResponseDto::from(report).with_generator(profile)),
        None,
        None,
    )))
}

/// Change a report's status
///
/// Setting the status a report already has is a no-op: the report is
/// returned unchanged and no notification is sent.
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated or already set", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn update_report_status(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let actor = format!("admin:{}", admin.email);
    let (report, message) = match service.update_status(id, dto.status, &actor).await? {
        StatusChange::Changed { report, previous } => {
            let message = format!("Report status updated from {} to {}", previous, report.status);
            (report, message)
        }
        StatusChange::Unchanged(report) => {
            let message = format!("Report status is already {}", report.status);
            (report, message)
        }
    };

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(message),
        None,
    )))
}
