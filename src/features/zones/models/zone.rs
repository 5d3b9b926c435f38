use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of collection point inside a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema, Default)]
#[sqlx(type_name = "place_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    #[default]
    CollectionPoint,
    Bin,
    DropOff,
    RecyclingCenter,
    Other,
}

#[derive(Debug, Clone, FromRow)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Place {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub name: String,
    pub place_type: PlaceType,
    pub is_active: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
