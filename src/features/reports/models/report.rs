use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reports::models::GeneratorType;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status")]
pub enum ReportStatus {
    Pending,
    Verified,
    Collected,
    Cancelled,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pending,
        ReportStatus::Verified,
        ReportStatus::Collected,
        ReportStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Verified => "Verified",
            ReportStatus::Collected => "Collected",
            ReportStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for a waste report
#[derive(Debug, Clone, FromRow)]
pub struct WasteReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub place_id: Option<Uuid>,
    pub place_name: Option<String>,
    pub generator_type: Option<GeneratorType>,
    pub generator_details_id: Option<Uuid>,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WasteReport {
    pub fn total_kg(&self) -> f64 {
        self.wet_kg + self.dry_kg + self.plastic_kg + self.e_waste_kg
    }
}

/// Data for creating a new report
#[derive(Debug)]
pub struct CreateReport {
    pub user_id: Uuid,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub place_id: Option<Uuid>,
    pub place_name: Option<String>,
    pub generator_type: Option<GeneratorType>,
    pub details: Option<String>,
}

/// Outcome of a conditional status update
#[derive(Debug)]
pub enum StatusChange {
    Changed {
        report: WasteReport,
        previous: ReportStatus,
    },
    /// The report already had the requested status; nothing was written
    Unchanged(WasteReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format_is_capitalized() {
        for status in ReportStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!(serde_json::from_str::<ReportStatus>("\"Shipped\"").is_err());
        assert!(serde_json::from_str::<ReportStatus>("\"pending\"").is_err());
    }
}
