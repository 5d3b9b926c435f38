use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::{
    AnalyticsQueryParams, AnalyticsSummaryDto, CategoryByZoneDto, CategoryHighLowDto,
    CategoryShareDto, EcoPointsDayDto, ZoneTotalDto,
};
use crate::features::analytics::services::rollup::{
    self, CategoryTotals, DailyStatusTotal, ZoneRollup,
};
use crate::features::reports::models::ReportStatus;
use crate::features::users::services::UserService;
use crate::shared::date_range::{day_bounds, start_of_local_day, DateBounds};

/// Sums per zone. The zone name is the most recent snapshot.
const ZONE_ROLLUP_SELECT: &str = r#"
    SELECT
        zone_id,
        (ARRAY_AGG(zone_name ORDER BY created_at DESC))[1] AS zone_name,
        COALESCE(SUM(wet_kg), 0) AS wet_kg,
        COALESCE(SUM(dry_kg), 0) AS dry_kg,
        COALESCE(SUM(plastic_kg), 0) AS plastic_kg,
        COALESCE(SUM(e_waste_kg), 0) AS e_waste_kg,
        COUNT(*) AS count
    FROM waste_reports
    WHERE TRUE
"#;

#[derive(Debug, FromRow)]
struct StatusWeightRow {
    created_at: DateTime<Utc>,
    status: ReportStatus,
    total_kg: f64,
}

#[derive(Debug, FromRow)]
struct StatusCountsRow {
    total_reports: i64,
    pending: i64,
    verified: i64,
    collected: i64,
    cancelled: i64,
    total_waste_kg: f64,
}

/// Read-only aggregations for the admin dashboard
pub struct AnalyticsService {
    pool: PgPool,
    user_service: Arc<UserService>,
}

impl AnalyticsService {
    pub fn new(pool: PgPool, user_service: Arc<UserService>) -> Self {
        Self { pool, user_service }
    }

    async fn zone_rollups(&self, filter: &AnalyticsQueryParams) -> Result<Vec<ZoneRollup>> {
        let bounds = day_bounds(filter.from_date, filter.to_date)?;

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(ZONE_ROLLUP_SELECT);
        push_analytics_filters(&mut query, filter, &bounds);
        query.push(" GROUP BY zone_id");

        query
            .build_query_as::<ZoneRollup>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to aggregate reports by zone: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn zone_totals(&self, filter: &AnalyticsQueryParams) -> Result<Vec<ZoneTotalDto>> {
        Ok(rollup::zone_totals(self.zone_rollups(filter).await?))
    }

    pub async fn category_by_zone(
        &self,
        filter: &AnalyticsQueryParams,
    ) -> Result<Vec<CategoryByZoneDto>> {
        Ok(rollup::category_by_zone(self.zone_rollups(filter).await?))
    }

    pub async fn top_zones(
        &self,
        filter: &AnalyticsQueryParams,
        limit: Option<i64>,
    ) -> Result<Vec<ZoneTotalDto>> {
        Ok(rollup::top_zones(self.zone_rollups(filter).await?, limit))
    }

    pub async fn category_high_low(
        &self,
        filter: &AnalyticsQueryParams,
    ) -> Result<Vec<CategoryHighLowDto>> {
        Ok(rollup::category_high_low(self.zone_rollups(filter).await?))
    }

    /// Collected versus cancelled kilograms over the trailing week, by local day
    pub async fn eco_points_distribution(&self) -> Result<Vec<EcoPointsDayDto>> {
        let today = Local::now().date_naive();
        let start = start_of_local_day(rollup::eco_points_window_start(today))?;
        let end = day_bounds(None, Some(today))?.end;

        let rows = sqlx::query_as::<_, StatusWeightRow>(
            r#"
            SELECT created_at, status,
                   wet_kg + dry_kg + plastic_kg + e_waste_kg AS total_kg
            FROM waste_reports
            WHERE status IN ('Collected', 'Cancelled')
              AND created_at >= $1
              AND ($2::timestamptz IS NULL OR created_at < $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load eco points window: {:?}", e);
            AppError::Database(e)
        })?;

        let daily: Vec<DailyStatusTotal> = rows
            .into_iter()
            .map(|row| DailyStatusTotal {
                day: row.created_at.with_timezone(&Local).date_naive(),
                status: row.status,
                total_kg: row.total_kg,
            })
            .collect();

        Ok(rollup::eco_points(today, &daily))
    }

    pub async fn top_categories(&self) -> Result<Vec<CategoryShareDto>> {
        let totals = sqlx::query_as::<_, CategoryTotals>(
            r#"
            SELECT
                COALESCE(SUM(wet_kg), 0) AS wet_kg,
                COALESCE(SUM(dry_kg), 0) AS dry_kg,
                COALESCE(SUM(plastic_kg), 0) AS plastic_kg,
                COALESCE(SUM(e_waste_kg), 0) AS e_waste_kg
            FROM waste_reports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sum report categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rollup::top_categories(totals))
    }

    pub async fn summary(&self) -> Result<AnalyticsSummaryDto> {
        let counts = sqlx::query_as::<_, StatusCountsRow>(
            r#"
            SELECT
                COUNT(*) AS total_reports,
                COUNT(*) FILTER (WHERE status = 'Pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'Verified') AS verified,
                COUNT(*) FILTER (WHERE status = 'Collected') AS collected,
                COUNT(*) FILTER (WHERE status = 'Cancelled') AS cancelled,
                COALESCE(SUM(wet_kg + dry_kg + plastic_kg + e_waste_kg), 0) AS total_waste_kg
            FROM waste_reports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports by status: {:?}", e);
            AppError::Database(e)
        })?;

        let total_users = self.user_service.count(None).await?;

        Ok(AnalyticsSummaryDto {
            total_reports: counts.total_reports,
            pending: counts.pending,
            verified: counts.verified,
            collected: counts.collected,
            cancelled: counts.cancelled,
            total_waste_kg: counts.total_waste_kg,
            total_users,
        })
    }
}

fn push_analytics_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &AnalyticsQueryParams,
    bounds: &DateBounds,
) {
    if let Some(zone_id) = filter.zone_id {
        query.push(" AND zone_id = ").push_bind(zone_id);
    }
    if let Some(generator_type) = filter.generator_type {
        query.push(" AND generator_type = ").push_bind(generator_type);
    }
    if let Some(start) = bounds.start {
        query.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = bounds.end {
        query.push(" AND created_at < ").push_bind(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_filters_append_in_order() {
        let filter = AnalyticsQueryParams {
            zone_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(ZONE_ROLLUP_SELECT);
        push_analytics_filters(&mut query, &filter, &DateBounds::default());
        query.push(" GROUP BY zone_id");

        let sql = query.sql();
        assert!(sql.contains("AND zone_id = $1"));
        assert!(!sql.contains("generator_type ="));
        assert!(sql.trim_end().ends_with("GROUP BY zone_id"));
    }
}
