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
use crate::features::zones::dtos::{
    CreatePlaceDto, CreateZoneDto, PlaceResponseDto, UpdatePlaceDto, UpdateZoneDto,
    ZoneQueryParams, ZoneResponseDto,
};
use crate::features::zones::services::ZoneService;
use crate::shared::types::ApiResponse;

/// Only the admin may see inactive zones and places
fn include_inactive(principal: &Principal, params: &ZoneQueryParams) -> bool {
    principal.is_admin() && params.include_inactive.unwrap_or(false)
}

// ==================== Read ====================

/// List zones with their places
#[utoipa::path(
    get,
    path = "/api/zones",
    params(ZoneQueryParams),
    responses(
        (status = 200, description = "List of zones", body = ApiResponse<Vec<ZoneResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn list_zones(
    principal: Principal,
    State(service): State<Arc<ZoneService>>,
    Query(params): Query<ZoneQueryParams>,
) -> Result<Json<ApiResponse<Vec<ZoneResponseDto>>>> {
    let zones = service
        .list(include_inactive(&principal, &params))
        .await?;
    Ok(Json(ApiResponse::success(Some(zones), None, None)))
}

/// Get a zone by ID
#[utoipa::path(
    get,
    path = "/api/zones/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID"),
        ZoneQueryParams
    ),
    responses(
        (status = 200, description = "Zone details", body = ApiResponse<ZoneResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn get_zone(
    principal: Principal,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ZoneQueryParams>,
) -> Result<Json<ApiResponse<ZoneResponseDto>>> {
    let zone = service
        .get(id, include_inactive(&principal, &params))
        .await?;
    Ok(Json(ApiResponse::success(Some(zone), None, None)))
}

// ==================== Admin ====================

/// Create a zone, optionally with initial places
#[utoipa::path(
    post,
    path = "/api/admin/zones",
    request_body = CreateZoneDto,
    responses(
        (status = 201, description = "Zone created", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 409, description = "Zone name already exists")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn create_zone(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    AppJson(dto): AppJson<CreateZoneDto>,
) -> Result<(StatusCode, Json<ApiResponse<ZoneResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let zone = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(zone),
            Some("Zone created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a zone
#[utoipa::path(
    put,
    path = "/api/admin/zones/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    request_body = UpdateZoneDto,
    responses(
        (status = 200, description = "Zone updated", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Zone not found"),
        (status = 409, description = "Zone name already exists")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn update_zone(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateZoneDto>,
) -> Result<Json<ApiResponse<ZoneResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let zone = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(zone),
        Some("Zone updated successfully".to_string()),
        None,
    )))
}

/// Deactivate a zone
#[utoipa::path(
    delete,
    path = "/api/admin/zones/{id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Zone deactivated"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn delete_zone(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.deactivate(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Zone deactivated".to_string()),
        None,
    )))
}

/// Append a place to a zone
#[utoipa::path(
    post,
    path = "/api/admin/zones/{id}/places",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    request_body = CreatePlaceDto,
    responses(
        (status = 201, description = "Place created", body = ApiResponse<PlaceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn add_place(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreatePlaceDto>,
) -> Result<(StatusCode, Json<ApiResponse<PlaceResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let place = service.add_place(id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(place), None, None)),
    ))
}

/// Update a place
#[utoipa::path(
    put,
    path = "/api/admin/zones/{id}/places/{place_id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID"),
        ("place_id" = Uuid, Path, description = "Place ID")
    ),
    request_body = UpdatePlaceDto,
    responses(
        (status = 200, description = "Place updated", body = ApiResponse<PlaceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Place not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn update_place(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    Path((id, place_id)): Path<(Uuid, Uuid)>,
    AppJson(dto): AppJson<UpdatePlaceDto>,
) -> Result<Json<ApiResponse<PlaceResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let place = service.update_place(id, place_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(place), None, None)))
}

/// Remove a place from a zone
#[utoipa::path(
    delete,
    path = "/api/admin/zones/{id}/places/{place_id}",
    params(
        ("id" = Uuid, Path, description = "Zone ID"),
        ("place_id" = Uuid, Path, description = "Place ID")
    ),
    responses(
        (status = 200, description = "Place removed"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Place not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn delete_place(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ZoneService>>,
    Path((id, place_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_place(id, place_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Place removed".to_string()),
        None,
    )))
}
