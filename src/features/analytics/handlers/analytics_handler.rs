use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::analytics::dtos::{
    AnalyticsQueryParams, AnalyticsSummaryDto, CategoryByZoneDto, CategoryHighLowDto,
    CategoryShareDto, EcoPointsDayDto, TopZonesQueryParams, ZoneTotalDto,
};
use crate::features::analytics::services::AnalyticsService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(Some(data), None, None))
}

/// Waste totals per zone, largest first
#[utoipa::path(
    get,
    path = "/api/admin/analytics/zone-totals",
    params(AnalyticsQueryParams),
    responses(
        (status = 200, description = "Totals per zone", body = ApiResponse<Vec<ZoneTotalDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn zone_totals(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(filter): Query<AnalyticsQueryParams>,
) -> Result<Json<ApiResponse<Vec<ZoneTotalDto>>>> {
    Ok(ok(service.zone_totals(&filter).await?))
}

/// Category sums per zone
#[utoipa::path(
    get,
    path = "/api/admin/analytics/category-by-zone",
    params(AnalyticsQueryParams),
    responses(
        (status = 200, description = "Category sums per zone", body = ApiResponse<Vec<CategoryByZoneDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn category_by_zone(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(filter): Query<AnalyticsQueryParams>,
) -> Result<Json<ApiResponse<Vec<CategoryByZoneDto>>>> {
    Ok(ok(service.category_by_zone(&filter).await?))
}

/// The zones with the most reported waste
#[utoipa::path(
    get,
    path = "/api/admin/analytics/top-zones",
    params(TopZonesQueryParams),
    responses(
        (status = 200, description = "Top zones", body = ApiResponse<Vec<ZoneTotalDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn top_zones(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(params): Query<TopZonesQueryParams>,
) -> Result<Json<ApiResponse<Vec<ZoneTotalDto>>>> {
    Ok(ok(service
        .top_zones(&params.filter(), Some(params.limit))
        .await?))
}

/// Highest and lowest category per zone
#[utoipa::path(
    get,
    path = "/api/admin/analytics/category-high-low",
    params(AnalyticsQueryParams),
    responses(
        (status = 200, description = "Category extremes per zone", body = ApiResponse<Vec<CategoryHighLowDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn category_high_low(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(filter): Query<AnalyticsQueryParams>,
) -> Result<Json<ApiResponse<Vec<CategoryHighLowDto>>>> {
    Ok(ok(service.category_high_low(&filter).await?))
}

/// Collected versus cancelled kilograms for each of the last seven days
#[utoipa::path(
    get,
    path = "/api/admin/analytics/eco-points-distribution",
    responses(
        (status = 200, description = "Seven daily entries, oldest first", body = ApiResponse<Vec<EcoPointsDayDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn eco_points_distribution(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<Vec<EcoPointsDayDto>>>> {
    Ok(ok(service.eco_points_distribution().await?))
}

/// Share of each waste category across all reports
#[utoipa::path(
    get,
    path = "/api/admin/analytics/top-categories",
    responses(
        (status = 200, description = "All four categories by share", body = ApiResponse<Vec<CategoryShareDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn top_categories(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<Vec<CategoryShareDto>>>> {
    Ok(ok(service.top_categories().await?))
}

/// Dashboard header counters
#[utoipa::path(
    get,
    path = "/api/admin/analytics/summary",
    responses(
        (status = 200, description = "Report and user counters", body = ApiResponse<AnalyticsSummaryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "analytics",
    security(("bearer_auth" = []))
)]
pub async fn summary(
    _admin: RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<AnalyticsSummaryDto>>> {
    Ok(ok(service.summary().await?))
}
