use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::GeneratorType;
use crate::shared::constants::DEFAULT_TOP_ZONES_LIMIT;

// ============================================================================
// Query DTOs
// ============================================================================

/// Filters shared by the zone rollups
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AnalyticsQueryParams {
    /// Inclusive start date (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD), covers the whole day
    pub to_date: Option<NaiveDate>,
    pub zone_id: Option<Uuid>,
    pub generator_type: Option<GeneratorType>,
}

fn default_top_zones_limit() -> i64 {
    DEFAULT_TOP_ZONES_LIMIT
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TopZonesQueryParams {
    /// Number of zones to return, clamped to 1..=100
    #[serde(default = "default_top_zones_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub zone_id: Option<Uuid>,
    pub generator_type: Option<GeneratorType>,
}

impl TopZonesQueryParams {
    pub fn filter(&self) -> AnalyticsQueryParams {
        AnalyticsQueryParams {
            from_date: self.from_date,
            to_date: self.to_date,
            zone_id: self.zone_id,
            generator_type: self.generator_type,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// The four tracked waste categories, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WasteCategory {
    Wet,
    Dry,
    Plastic,
    #[serde(rename = "E-Waste")]
    EWaste,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 4] = [
        WasteCategory::Wet,
        WasteCategory::Dry,
        WasteCategory::Plastic,
        WasteCategory::EWaste,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTotalDto {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
    pub total_waste: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryByZoneDto {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryValueDto {
    pub category: WasteCategory,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHighLowDto {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub highest: CategoryValueDto,
    pub lowest: CategoryValueDto,
    /// All four categories in fixed order
    pub breakdown: Vec<CategoryValueDto>,
}

/// One day of the eco points chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EcoPointsDayDto {
    pub date: NaiveDate,
    /// Collected kilograms
    pub positive: f64,
    /// Cancelled kilograms, as a magnitude
    pub negative: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShareDto {
    pub category: WasteCategory,
    pub total_kg: f64,
    /// Share of all reported waste, rounded to a whole percent
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummaryDto {
    pub total_reports: i64,
    pub pending: i64,
    pub verified: i64,
    pub collected: i64,
    pub cancelled: i64,
    pub total_waste_kg: f64,
    pub total_users: i64,
}
