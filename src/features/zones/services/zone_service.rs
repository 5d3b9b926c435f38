use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::zones::dtos::{
    CreatePlaceDto, CreateZoneDto, PlaceResponseDto, UpdatePlaceDto, UpdateZoneDto,
    ZoneResponseDto,
};
use crate::features::zones::models::{Place, Zone};
use crate::shared::validation::clean_optional;

const ZONE_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

const PLACE_COLUMNS: &str =
    "id, zone_id, name, place_type, is_active, position, created_at, updated_at";

fn map_zone_write_error(e: sqlx::Error, action: &str) -> AppError {
    if AppError::is_unique_violation(&e) {
        return AppError::Conflict("A zone with this name already exists".to_string());
    }
    tracing::error!("Failed to {}: {:?}", action, e);
    AppError::Database(e)
}

/// Service for zones and the places inside them
pub struct ZoneService {
    pool: PgPool,
}

impl ZoneService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List zones with their places. Inactive rows only when asked for.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<ZoneResponseDto>> {
        let sql = format!(
            "SELECT {ZONE_COLUMNS} FROM zones WHERE ($1 OR is_active) ORDER BY name ASC"
        );
        let zones = sqlx::query_as::<_, Zone>(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list zones: {:?}", e);
                AppError::Database(e)
            })?;

        let zone_ids: Vec<Uuid> = zones.iter().map(|z| z.id).collect();
        let sql = format!(
            r#"
            SELECT {PLACE_COLUMNS} FROM places
            WHERE zone_id = ANY($1) AND ($2 OR is_active)
            ORDER BY position ASC, created_at ASC
            "#
        );
        let places = sqlx::query_as::<_, Place>(&sql)
            .bind(&zone_ids)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list places: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(attach_places(zones, places))
    }

    /// Get one zone with its places
    pub async fn get(&self, id: Uuid, include_inactive: bool) -> Result<ZoneResponseDto> {
        let zone = self
            .find_zone(id)
            .await?
            .filter(|z| include_inactive || z.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", id)))?;

        let places = self.places_of(id, include_inactive).await?;
        Ok(ZoneResponseDto::new(
            zone,
            places.into_iter().map(PlaceResponseDto::from).collect(),
        ))
    }

    pub async fn find_zone(&self, id: Uuid) -> Result<Option<Zone>> {
        let sql = format!("SELECT {ZONE_COLUMNS} FROM zones WHERE id = $1");

        sqlx::query_as::<_, Zone>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get zone: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn find_place(&self, id: Uuid) -> Result<Option<Place>> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = $1");

        sqlx::query_as::<_, Place>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get place: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn places_of(&self, zone_id: Uuid, include_inactive: bool) -> Result<Vec<Place>> {
        let sql = format!(
            r#"
            SELECT {PLACE_COLUMNS} FROM places
            WHERE zone_id = $1 AND ($2 OR is_active)
            ORDER BY position ASC, created_at ASC
            "#
        );

        sqlx::query_as::<_, Place>(&sql)
            .bind(zone_id)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list places for zone {}: {:?}", zone_id, e);
                AppError::Database(e)
            })
    }

    /// Create a zone and its initial places in one transaction
    pub async fn create(&self, dto: CreateZoneDto) -> Result<ZoneResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let sql = format!(
            r#"
            INSERT INTO zones (name, description)
            VALUES ($1, $2)
            RETURNING {ZONE_COLUMNS}
            "#
        );
        let zone = sqlx::query_as::<_, Zone>(&sql)
            .bind(dto.name.trim())
            .bind(clean_optional(dto.description))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_zone_write_error(e, "create zone"))?;

        let sql = format!(
            r#"
            INSERT INTO places (zone_id, name, place_type, position)
            VALUES ($1, $2, $3, $4)
            RETURNING {PLACE_COLUMNS}
            "#
        );
        let mut places = Vec::with_capacity(dto.places.len());
        for (position, place) in dto.places.into_iter().enumerate() {
            let row = sqlx::query_as::<_, Place>(&sql)
                .bind(zone.id)
                .bind(place.name.trim())
                .bind(place.place_type)
                .bind(position as i32)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create place: {:?}", e);
                    AppError::Database(e)
                })?;
            places.push(PlaceResponseDto::from(row));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit zone creation: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Created zone {} with {} places", zone.id, places.len());
        Ok(ZoneResponseDto::new(zone, places))
    }

    /// Update zone fields. Existing reports keep their snapshot name.
    pub async fn update(&self, id: Uuid, dto: UpdateZoneDto) -> Result<ZoneResponseDto> {
        let sql = format!(
            r#"
            UPDATE zones
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ZONE_COLUMNS}
            "#
        );

        let zone = sqlx::query_as::<_, Zone>(&sql)
            .bind(id)
            .bind(clean_optional(dto.name))
            .bind(clean_optional(dto.description))
            .bind(dto.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_zone_write_error(e, "update zone"))?
            .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", id)))?;

        let places = self.places_of(id, true).await?;
        tracing::info!("Updated zone {}", id);
        Ok(ZoneResponseDto::new(
            zone,
            places.into_iter().map(PlaceResponseDto::from).collect(),
        ))
    }

    /// Soft delete: the zone stays referenced by historical reports
    pub async fn deactivate(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE zones SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to deactivate zone: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Zone {} not found", id)));
        }

        tracing::info!("Deactivated zone {}", id);
        Ok(())
    }

    /// Append a place after the zone's current last position
    pub async fn add_place(&self, zone_id: Uuid, dto: CreatePlaceDto) -> Result<PlaceResponseDto> {
        if self.find_zone(zone_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Zone {} not found", zone_id)));
        }

        let sql = format!(
            r#"
            INSERT INTO places (zone_id, name, place_type, position)
            SELECT $1, $2, $3, COALESCE(MAX(position) + 1, 0)
            FROM places WHERE zone_id = $1
            RETURNING {PLACE_COLUMNS}
            "#
        );

        let place = sqlx::query_as::<_, Place>(&sql)
            .bind(zone_id)
            .bind(dto.name.trim())
            .bind(dto.place_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to add place: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Added place {} to zone {}", place.id, zone_id);
        Ok(place.into())
    }

    pub async fn update_place(
        &self,
        zone_id: Uuid,
        place_id: Uuid,
        dto: UpdatePlaceDto,
    ) -> Result<PlaceResponseDto> {
        let sql = format!(
            r#"
            UPDATE places
            SET name = COALESCE($3, name),
                place_type = COALESCE($4, place_type),
                is_active = COALESCE($5, is_active),
                position = COALESCE($6, position),
                updated_at = NOW()
            WHERE id = $2 AND zone_id = $1
            RETURNING {PLACE_COLUMNS}
            "#
        );

        let place = sqlx::query_as::<_, Place>(&sql)
            .bind(zone_id)
            .bind(place_id)
            .bind(clean_optional(dto.name))
            .bind(dto.place_type)
            .bind(dto.is_active)
            .bind(dto.position)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update place: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Place {} not found", place_id)))?;

        Ok(place.into())
    }

    /// Remove a place. Reports keep `place_name`; their `place_id` is nulled by the FK.
    pub async fn delete_place(&self, zone_id: Uuid, place_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM places WHERE id = $2 AND zone_id = $1")
            .bind(zone_id)
            .bind(place_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete place: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Place {} not found", place_id)));
        }

        tracing::info!("Deleted place {} from zone {}", place_id, zone_id);
        Ok(())
    }
}

/// Group places under their zones, keeping zone order and place order
fn attach_places(zones: Vec<Zone>, places: Vec<Place>) -> Vec<ZoneResponseDto> {
    let mut by_zone: HashMap<Uuid, Vec<PlaceResponseDto>> = HashMap::new();
    for place in places {
        by_zone
            .entry(place.zone_id)
            .or_default()
            .push(PlaceResponseDto::from(place));
    }

    zones
        .into_iter()
        .map(|zone| {
            let places = by_zone.remove(&zone.id).unwrap_or_default();
            ZoneResponseDto::new(zone, places)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::zones::models::PlaceType;
    use chrono::Utc;

    fn zone(name: &str) -> Zone {
        Zone {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn place(zone_id: Uuid, name: &str, position: i32) -> Place {
        Place {
            id: Uuid::new_v4(),
            zone_id,
            name: name.to_string(),
            place_type: PlaceType::Bin,
            is_active: true,
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_places_groups_and_keeps_order() {
        let north = zone("North");
        let south = zone("South");
        let places = vec![
            place(south.id, "S-0", 0),
            place(north.id, "N-0", 0),
            place(north.id, "N-1", 1),
        ];

        let result = attach_places(vec![north.clone(), south.clone()], places);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "North");
        let north_places: Vec<&str> = result[0].places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(north_places, vec!["N-0", "N-1"]);
        assert_eq!(result[1].places.len(), 1);
    }

    #[test]
    fn test_attach_places_zone_without_places() {
        let result = attach_places(vec![zone("Empty")], vec![]);
        assert!(result[0].places.is_empty());
    }
}
