use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Who produced the waste
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "generator_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    Household,
    Shop,
    Institution,
    Office,
    Apartment,
}

/// Generator details. Each kind carries its own optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratorProfile {
    #[serde(rename_all = "camelCase")]
    Household {
        house_number: Option<String>,
        members: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Shop {
        shop_name: Option<String>,
        business_type: Option<String>,
        employees: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Institution {
        institution_name: Option<String>,
        institution_type: Option<String>,
        occupants: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Office {
        company_name: Option<String>,
        floor: Option<String>,
        employees: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Apartment {
        apartment_name: Option<String>,
        block: Option<String>,
        units: Option<u32>,
    },
}

impl GeneratorProfile {
    pub fn generator_type(&self) -> GeneratorType {
        match self {
            GeneratorProfile::Household { .. } => GeneratorType::Household,
            GeneratorProfile::Shop { .. } => GeneratorType::Shop,
            GeneratorProfile::Institution { .. } => GeneratorType::Institution,
            GeneratorProfile::Office { .. } => GeneratorType::Office,
            GeneratorProfile::Apartment { .. } => GeneratorType::Apartment,
        }
    }
}
