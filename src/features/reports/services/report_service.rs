use std::sync::Arc;

use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::notifications::NotificationService;
use crate::features::reports::dtos::{CreateReportDto, ReportQueryParams};
use crate::features::reports::models::{
    CreateReport, GeneratorProfile, ReportStatus, StatusChange, WasteReport,
};
use crate::features::zones::ZoneService;
use crate::shared::date_range::{day_bounds, DateBounds};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::clean_optional;

const REPORT_COLUMNS: &str = r#"
    id, user_id, wet_kg, dry_kg, plastic_kg, e_waste_kg,
    zone_id, zone_name, place_id, place_name,
    generator_type, generator_details_id, details, status,
    created_at, updated_at
"#;

/// Report row plus the status it had before a conditional update
#[derive(Debug, sqlx::FromRow)]
struct ChangedRow {
    #[sqlx(flatten)]
    report: WasteReport,
    previous_status: ReportStatus,
}

/// Service for the waste report workflow
pub struct ReportService {
    pool: PgPool,
    zone_service: Arc<ZoneService>,
    notification_service: Arc<NotificationService>,
}

impl ReportService {
    pub fn new(
        pool: PgPool,
        zone_service: Arc<ZoneService>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            pool,
            zone_service,
            notification_service,
        }
    }

    /// Submit a report for `user_id`.
    ///
    /// The report insert is authoritative. Generator details are written
    /// afterwards; if that fails the report is still returned without them.
    pub async fn create(
        &self,
        user_id: Uuid,
        dto: CreateReportDto,
    ) -> Result<(WasteReport, Option<GeneratorProfile>)> {
        dto.check_weights()?;

        let zone = self
            .zone_service
            .find_zone(dto.zone_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", dto.zone_id)))?;
        if !zone.is_active {
            return Err(AppError::BadRequest("Zone is not active".to_string()));
        }

        let place_name = match dto.place_id {
            Some(place_id) => {
                let place = self
                    .zone_service
                    .find_place(place_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Place {} not found", place_id)))?;
                if place.zone_id != zone.id {
                    return Err(AppError::BadRequest(
                        "Place does not belong to the selected zone".to_string(),
                    ));
                }
                if !place.is_active {
                    return Err(AppError::BadRequest("Place is not active".to_string()));
                }
                Some(place.name)
            }
            None => None,
        };

        let report = self
            .insert(&CreateReport {
                user_id,
                wet_kg: dto.wet_kg,
                dry_kg: dto.dry_kg,
                plastic_kg: dto.plastic_kg,
                e_waste_kg: dto.e_waste_kg,
                zone_id: zone.id,
                zone_name: zone.name,
                place_id: dto.place_id,
                place_name,
                generator_type: dto.generator.as_ref().map(GeneratorProfile::generator_type),
                details: clean_optional(dto.details),
            })
            .await?;

        let Some(profile) = dto.generator else {
            return Ok((report, None));
        };

        match self.attach_generator_details(&report, &profile).await {
            Ok(updated) => Ok((updated, Some(profile))),
            Err(e) => {
                tracing::warn!(
                    "Report {} saved without generator details: {}",
                    report.id,
                    e
                );
                Ok((report, None))
            }
        }
    }

    async fn insert(&self, data: &CreateReport) -> Result<WasteReport> {
        let sql = format!(
            r#"
            INSERT INTO waste_reports (
                user_id, wet_kg, dry_kg, plastic_kg, e_waste_kg,
                zone_id, zone_name, place_id, place_name,
                generator_type, details, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'Pending')
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let report = sqlx::query_as::<_, WasteReport>(&sql)
            .bind(data.user_id)
            .bind(data.wet_kg)
            .bind(data.dry_kg)
            .bind(data.plastic_kg)
            .bind(data.e_waste_kg)
            .bind(data.zone_id)
            .bind(&data.zone_name)
            .bind(data.place_id)
            .bind(&data.place_name)
            .bind(data.generator_type)
            .bind(&data.details)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Created report {} for user {}", report.id, data.user_id);
        Ok(report)
    }

    /// Store the generator details row and link it back to the report
    async fn attach_generator_details(
        &self,
        report: &WasteReport,
        profile: &GeneratorProfile,
    ) -> Result<WasteReport> {
        let details_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO generator_details (report_id, generator_type, details)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(report.id)
        .bind(profile.generator_type())
        .bind(Json(profile))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create generator details: {:?}", e);
            AppError::Database(e)
        })?;

        let sql = format!(
            r#"
            UPDATE waste_reports
            SET generator_details_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, WasteReport>(&sql)
            .bind(report.id)
            .bind(details_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to link generator details: {:?}", e);
                AppError::Database(e)
            })
    }

    /// The caller's own reports, newest first
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<WasteReport>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waste_reports WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM waste_reports
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        );
        let reports = sqlx::query_as::<_, WasteReport>(&sql)
            .bind(user_id)
            .bind(pagination.offset())
            .bind(pagination.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports by user: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((reports, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WasteReport>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM waste_reports WHERE id = $1");

        sqlx::query_as::<_, WasteReport>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get a report with its generator details
    pub async fn get(&self, id: Uuid) -> Result<(WasteReport, Option<GeneratorProfile>)> {
        let report = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        let profile = self.generator_profile(&report).await?;
        Ok((report, profile))
    }

    /// Get one of the caller's reports. Someone else's report is reported as missing.
    pub async fn get_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(WasteReport, Option<GeneratorProfile>)> {
        let (report, profile) = self.get(id).await?;
        if report.user_id != user_id {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }
        Ok((report, profile))
    }

    async fn generator_profile(&self, report: &WasteReport) -> Result<Option<GeneratorProfile>> {
        if report.generator_details_id.is_none() {
            return Ok(None);
        }

        let details = sqlx::query_scalar::<_, Json<GeneratorProfile>>(
            "SELECT details FROM generator_details WHERE report_id = $1",
        )
        .bind(report.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get generator details: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(details.map(|Json(profile)| profile))
    }

    /// Admin listing with filters
    pub async fn list(&self, params: &ReportQueryParams) -> Result<(Vec<WasteReport>, i64)> {
        let bounds = day_bounds(params.from_date, params.to_date)?;
        let pagination = params.pagination();

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM waste_reports WHERE TRUE");
        push_report_filters(&mut count_query, params, &bounds);

        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {REPORT_COLUMNS} FROM waste_reports WHERE TRUE"
        ));
        push_report_filters(&mut query, params, &bounds);
        query
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(pagination.offset())
            .push(" LIMIT ")
            .push_bind(pagination.limit());

        let reports = query
            .build_query_as::<WasteReport>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((reports, total))
    }

    /// Move a report to `status`.
    ///
    /// The write only happens when the stored status differs, and the row is
    /// locked while that is decided, so concurrent identical requests produce
    /// a single transition and a single notification.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        actor: &str,
    ) -> Result<StatusChange> {
        let changed = sqlx::query_as::<_, ChangedRow>(
            r#"
            WITH prev AS (
                SELECT id, status FROM waste_reports WHERE id = $1 FOR UPDATE
            )
            UPDATE waste_reports r
            SET status = $2, updated_at = NOW()
            FROM prev
            WHERE r.id = prev.id AND prev.status <> $2
            RETURNING
                r.id, r.user_id, r.wet_kg, r.dry_kg, r.plastic_kg, r.e_waste_kg,
                r.zone_id, r.zone_name, r.place_id, r.place_name,
                r.generator_type, r.generator_details_id, r.details, r.status,
                r.created_at, r.updated_at,
                prev.status AS previous_status
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            AppError::Database(e)
        })?;

        let Some(row) = changed else {
            let report = self
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
            return Ok(StatusChange::Unchanged(report));
        };

        tracing::info!(
            "Report {} status {} -> {} by {}",
            id,
            row.previous_status,
            row.report.status,
            actor
        );

        self.notification_service
            .notify_status_change(&row.report, row.previous_status)
            .await;

        Ok(StatusChange::Changed {
            report: row.report,
            previous: row.previous_status,
        })
    }
}

fn push_report_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    params: &ReportQueryParams,
    bounds: &DateBounds,
) {
    if let Some(status) = params.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(zone_id) = params.zone_id {
        query.push(" AND zone_id = ").push_bind(zone_id);
    }
    if let Some(generator_type) = params.generator_type {
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
    use crate::shared::test_helpers::{count_rows, seed_report, seed_user, seed_zone};

    fn services(pool: &PgPool) -> ReportService {
        let zone_service = Arc::new(ZoneService::new(pool.clone()));
        let notification_service = Arc::new(NotificationService::new(
            pool.clone(),
            Arc::clone(&zone_service),
        ));
        ReportService::new(pool.clone(), zone_service, notification_service)
    }

    fn report_dto(zone_id: Uuid, generator: Option<GeneratorProfile>) -> CreateReportDto {
        CreateReportDto {
            wet_kg: 2.0,
            dry_kg: 1.0,
            plastic_kg: 0.5,
            e_waste_kg: 0.0,
            zone_id,
            place_id: None,
            details: Some("  behind the market  ".to_string()),
            generator,
        }
    }

    async fn status_notifications(pool: &PgPool, report_id: Uuid) -> Vec<(Uuid, String)> {
        sqlx::query_as(
            r#"
            SELECT user_id, message FROM notifications
            WHERE report_id = $1 AND notification_type = 'REPORT_STATUS'
            "#,
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_status_update_writes_nothing(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        let id = seed_report(&pool, owner, zone, ReportStatus::Pending).await;
        let before = services(&pool).find_by_id(id).await.unwrap().unwrap();

        let change = services(&pool)
            .update_status(id, ReportStatus::Pending, "admin")
            .await
            .unwrap();

        let report = match change {
            StatusChange::Unchanged(report) => report,
            other => panic!("expected no change, got {:?}", other),
        };
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.updated_at, before.updated_at);
        assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM notifications").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_transition_notifies_owner_once(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        let id = seed_report(&pool, owner, zone, ReportStatus::Pending).await;
        let service = services(&pool);

        let change = service
            .update_status(id, ReportStatus::Collected, "admin")
            .await
            .unwrap();
        match change {
            StatusChange::Changed { report, previous } => {
                assert_eq!(previous, ReportStatus::Pending);
                assert_eq!(report.status, ReportStatus::Collected);
            }
            other => panic!("expected a change, got {:?}", other),
        }

        // Repeating the same target is a no-op
        let again = service
            .update_status(id, ReportStatus::Collected, "admin")
            .await
            .unwrap();
        assert!(matches!(again, StatusChange::Unchanged(_)));

        let notifications = status_notifications(&pool, id).await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, owner);
        assert!(notifications[0].1.to_lowercase().contains("collected"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_identical_updates_notify_once(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        let id = seed_report(&pool, owner, zone, ReportStatus::Pending).await;
        let service = Arc::new(services(&pool));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .update_status(id, ReportStatus::Verified, "admin")
                        .await
                })
            })
            .collect();

        let mut changed = 0;
        for handle in handles {
            if let StatusChange::Changed { .. } = handle.await.unwrap().unwrap() {
                changed += 1;
            }
        }

        assert_eq!(changed, 1);
        assert_eq!(status_notifications(&pool, id).await.len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_missing_report_is_not_found(pool: PgPool) {
        let result = services(&pool)
            .update_status(Uuid::new_v4(), ReportStatus::Verified, "admin")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_stores_generator_details(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        let profile = GeneratorProfile::Household {
            house_number: Some("12B".to_string()),
            members: Some(4),
        };
        let service = services(&pool);

        let (report, stored) = service
            .create(owner, report_dto(zone, Some(profile.clone())))
            .await
            .unwrap();

        assert_eq!(stored.as_ref(), Some(&profile));
        assert!(report.generator_details_id.is_some());
        assert_eq!(report.zone_name, "North");
        assert_eq!(report.details.as_deref(), Some("behind the market"));

        let (_, fetched) = service.get_for_user(owner, report.id).await.unwrap();
        assert_eq!(fetched, Some(profile));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generator_details_failure_keeps_report(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        sqlx::query("ALTER TABLE generator_details RENAME TO generator_details_unavailable")
            .execute(&pool)
            .await
            .unwrap();
        let service = services(&pool);

        let (report, stored) = service
            .create(
                owner,
                report_dto(
                    zone,
                    Some(GeneratorProfile::Shop {
                        shop_name: Some("Corner Store".to_string()),
                        business_type: None,
                        employees: Some(3),
                    }),
                ),
            )
            .await
            .unwrap();

        assert!(stored.is_none());
        assert!(report.generator_details_id.is_none());

        let (fetched, profile) = service.get(report.id).await.unwrap();
        assert_eq!(fetched.id, report.id);
        assert_eq!(fetched.status, ReportStatus::Pending);
        assert!(profile.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_other_users_report_is_not_found(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;
        let zone = seed_zone(&pool, "North").await;
        let id = seed_report(&pool, owner, zone, ReportStatus::Pending).await;

        let result = services(&pool).get_for_user(stranger, id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
