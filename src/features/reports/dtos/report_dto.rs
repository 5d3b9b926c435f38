use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::reports::dtos::weight::{check_weight, deserialize_weight};
use crate::features::reports::models::{
    GeneratorProfile, GeneratorType, ReportStatus, WasteReport,
};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request DTO for submitting a waste report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    /// Wet waste in kg; missing or non-numeric counts as 0
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub wet_kg: f64,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub dry_kg: f64,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub plastic_kg: f64,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub e_waste_kg: f64,

    pub zone_id: Uuid,

    pub place_id: Option<Uuid>,

    #[validate(length(max = 2000, message = "Details must not exceed 2000 characters"))]
    pub details: Option<String>,

    /// Optional description of who generated the waste
    pub generator: Option<GeneratorProfile>,
}

impl CreateReportDto {
    /// Reject negative and non-finite weights
    pub fn check_weights(&self) -> Result<()> {
        check_weight("wetKg", self.wet_kg)?;
        check_weight("dryKg", self.dry_kg)?;
        check_weight("plasticKg", self.plastic_kg)?;
        check_weight("eWasteKg", self.e_waste_kg)
    }
}

/// Request DTO for changing a report's status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: ReportStatus,
}

/// Query params for the admin report listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<ReportStatus>,
    pub zone_id: Option<Uuid>,
    pub generator_type: Option<GeneratorType>,
    /// Inclusive start date (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD), covers the whole day
    pub to_date: Option<NaiveDate>,
}

impl ReportQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
    pub total_kg: f64,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub place_id: Option<Uuid>,
    pub place_name: Option<String>,
    pub generator_type: Option<GeneratorType>,
    pub generator_details_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_details: Option<GeneratorProfile>,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportResponseDto {
    pub fn with_generator(mut self, profile: Option<GeneratorProfile>) -> Self {
        self.generator_details = profile;
        self
    }
}

impl From<WasteReport> for ReportResponseDto {
    fn from(r: WasteReport) -> Self {
        let total_kg = r.total_kg();
        Self {
            id: r.id,
            user_id: r.user_id,
            wet_kg: r.wet_kg,
            dry_kg: r.dry_kg,
            plastic_kg: r.plastic_kg,
            e_waste_kg: r.e_waste_kg,
            total_kg,
            zone_id: r.zone_id,
            zone_name: r.zone_name,
            place_id: r.place_id,
            place_name: r.place_name,
            generator_type: r.generator_type,
            generator_details_id: r.generator_details_id,
            generator_details: None,
            details: r.details,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[test]
    fn test_create_report_lenient_weights() {
        let dto: CreateReportDto = serde_json::from_value(serde_json::json!({
            "wetKg": "3.5",
            "dryKg": 2,
            "plasticKg": "lots",
            "zoneId": Uuid::nil(),
        }))
        .unwrap();

        assert_eq!(dto.wet_kg, 3.5);
        assert_eq!(dto.dry_kg, 2.0);
        assert_eq!(dto.plastic_kg, 0.0);
        assert_eq!(dto.e_waste_kg, 0.0);
        assert!(dto.check_weights().is_ok());
    }

    #[test]
    fn test_create_report_rejects_negative_weight() {
        let dto: CreateReportDto = serde_json::from_value(serde_json::json!({
            "eWasteKg": -1,
            "zoneId": Uuid::nil(),
        }))
        .unwrap();

        assert!(matches!(dto.check_weights(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_report_requires_zone() {
        let result = serde_json::from_value::<CreateReportDto>(serde_json::json!({ "wetKg": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_status_rejects_unknown_status() {
        assert!(serde_json::from_str::<UpdateStatusDto>(r#"{"status":"Lost"}"#).is_err());
        let dto: UpdateStatusDto = serde_json::from_str(r#"{"status":"Collected"}"#).unwrap();
        assert_eq!(dto.status, ReportStatus::Collected);
    }
}
