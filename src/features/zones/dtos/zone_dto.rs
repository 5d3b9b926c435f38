use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::zones::models::{Place, PlaceType, Zone};

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponseDto {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub name: String,
    pub place_type: PlaceType,
    pub is_active: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponseDto {
    fn from(p: Place) -> Self {
        Self {
            id: p.id,
            zone_id: p.zone_id,
            name: p.name,
            place_type: p.place_type,
            is_active: p.is_active,
            position: p.position,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// A zone with its places in display order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub places: Vec<PlaceResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ZoneResponseDto {
    pub fn new(zone: Zone, places: Vec<PlaceResponseDto>) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            description: zone.description,
            is_active: zone.is_active,
            places,
            created_at: zone.created_at,
            updated_at: zone.updated_at,
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceDto {
    #[validate(length(min = 1, max = 255, message = "Place name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub place_type: PlaceType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneDto {
    #[validate(length(min = 1, max = 255, message = "Zone name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    /// Initial places, stored in the given order
    #[serde(default)]
    #[validate(nested)]
    pub places: Vec<CreatePlaceDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZoneDto {
    #[validate(length(min = 1, max = 255, message = "Zone name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceDto {
    #[validate(length(min = 1, max = 255, message = "Place name must be 1-255 characters"))]
    pub name: Option<String>,

    pub place_type: Option<PlaceType>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ZoneQueryParams {
    /// Include inactive zones and places (admin only, ignored otherwise)
    pub include_inactive: Option<bool>,
}
