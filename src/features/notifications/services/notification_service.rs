use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Principal;
use crate::features::notifications::dtos::{NotificationQueryParams, SendNotificationDto};
use crate::features::notifications::models::{DeliveryMethod, Notification, NotificationType};
use crate::features::notifications::services::audience::{dedupe_first_seen, Audience};
use crate::features::notifications::services::status_text::status_change_text;
use crate::features::reports::models::{ReportStatus, WasteReport};
use crate::features::zones::ZoneService;
use crate::shared::date_range::day_bounds;

const NOTIFICATION_COLUMNS: &str = r#"
    id, user_id, report_id, zone_id, zone_name, title, message,
    notification_type, delivery_method, is_read, read_at, created_at
"#;

/// Service for creating, listing and marking notifications
pub struct NotificationService {
    pool: PgPool,
    zone_service: Arc<ZoneService>,
}

impl NotificationService {
    pub fn new(pool: PgPool, zone_service: Arc<ZoneService>) -> Self {
        Self { pool, zone_service }
    }

    /// Fan one message out to the resolved audience in a single insert
    pub async fn send(&self, dto: SendNotificationDto) -> Result<Vec<Notification>> {
        let bounds = day_bounds(dto.from_date, dto.to_date)?;

        let zone_name = match dto.zone_id {
            Some(zone_id) => Some(
                self.zone_service
                    .find_zone(zone_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", zone_id)))?
                    .name,
            ),
            None => None,
        };

        let recipients = match Audience::from_request(&dto.user_ids) {
            Audience::Explicit(ids) => ids,
            Audience::Derived => {
                let mut query: QueryBuilder<Postgres> =
                    QueryBuilder::new("SELECT user_id FROM waste_reports WHERE TRUE");
                if let Some(zone_id) = dto.zone_id {
                    query.push(" AND zone_id = ").push_bind(zone_id);
                }
                if let Some(status) = dto.status {
                    query.push(" AND status = ").push_bind(status);
                }
                if let Some(start) = bounds.start {
                    query.push(" AND created_at >= ").push_bind(start);
                }
                if let Some(end) = bounds.end {
                    query.push(" AND created_at < ").push_bind(end);
                }
                query.push(" ORDER BY created_at ASC");

                let owners: Vec<Uuid> = query
                    .build_query_scalar::<Uuid>()
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to resolve notification audience: {:?}", e);
                        AppError::Database(e)
                    })?;

                dedupe_first_seen(owners)
            }
        };

        if recipients.is_empty() {
            return Err(AppError::BadRequest(
                "No target users found for the selected criteria".to_string(),
            ));
        }

        let sql = format!(
            r#"
            INSERT INTO notifications (
                user_id, zone_id, zone_name, title, message,
                notification_type, delivery_method
            )
            SELECT recipient, $2, $3, $4, $5, $6, $7
            FROM UNNEST($1::uuid[]) AS t(recipient)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );

        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(&recipients)
            .bind(dto.zone_id)
            .bind(&zone_name)
            .bind(dto.title.trim())
            .bind(dto.message.trim())
            .bind(dto.notification_type)
            .bind(dto.delivery_method)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                if AppError::is_foreign_key_violation(&e) {
                    return AppError::BadRequest(
                        "One or more target users do not exist".to_string(),
                    );
                }
                tracing::error!("Failed to create notifications: {:?}", e);
                AppError::Database(e)
            })?;

        if dto.delivery_method == DeliveryMethod::InAppEmail {
            tracing::info!(
                "Email delivery requested for {} notifications; no mailer is configured",
                notifications.len()
            );
        }

        tracing::info!("Sent {} notifications", notifications.len());
        Ok(notifications)
    }

    /// Tell the owner their report moved. Never fails the caller.
    pub async fn notify_status_change(&self, report: &WasteReport, previous: ReportStatus) {
        if previous == report.status {
            return;
        }

        let (title, message) = status_change_text(report, previous);
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (
                user_id, report_id, zone_id, zone_name, title, message,
                notification_type, delivery_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(report.user_id)
        .bind(report.id)
        .bind(report.zone_id)
        .bind(&report.zone_name)
        .bind(title)
        .bind(message)
        .bind(NotificationType::ReportStatus)
        .bind(DeliveryMethod::InApp)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                "Failed to notify user {} about report {}: {:?}",
                report.user_id,
                report.id,
                e
            );
        }
    }

    /// A user sees their own notifications; the admin sees all, optionally per user
    pub async fn list(
        &self,
        principal: &Principal,
        params: &NotificationQueryParams,
    ) -> Result<(Vec<Notification>, i64)> {
        let recipient = recipient_filter(principal, params.user_id);
        let unread_only = params.unread_only.unwrap_or(false);
        let pagination = params.pagination();

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE TRUE");
        push_notification_filters(&mut count_query, recipient, unread_only);

        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count notifications: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE TRUE"
        ));
        push_notification_filters(&mut query, recipient, unread_only);
        query
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(pagination.offset())
            .push(" LIMIT ")
            .push_bind(pagination.limit());

        let notifications = query
            .build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list notifications: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((notifications, total))
    }

    /// Unread count: own for a user, global for the admin
    pub async fn unread_count(&self, principal: &Principal) -> Result<i64> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE TRUE");
        push_notification_filters(&mut query, principal.user_id(), true);

        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count unread notifications: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Idempotent: `read_at` keeps the first time it was set
    pub async fn mark_read(&self, principal: &Principal, id: Uuid) -> Result<Notification> {
        let sql = format!(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .bind(principal.user_id())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark notification read: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }
}

/// Users are always pinned to themselves; only the admin may pick a recipient
fn recipient_filter(principal: &Principal, requested: Option<Uuid>) -> Option<Uuid> {
    match principal {
        Principal::User(user) => Some(user.id),
        Principal::Admin(_) => requested,
    }
}

fn push_notification_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    recipient: Option<Uuid>,
    unread_only: bool,
) {
    if let Some(user_id) = recipient {
        query.push(" AND user_id = ").push_bind(user_id);
    }
    if unread_only {
        query.push(" AND is_read = FALSE");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_pool;
    use crate::shared::test_helpers::{
        citizen_principal, count_rows, create_admin, create_citizen, seed_report, seed_user,
        seed_zone,
    };

    fn service(pool: &PgPool) -> NotificationService {
        NotificationService::new(pool.clone(), Arc::new(ZoneService::new(pool.clone())))
    }

    fn send_dto(zone_id: Option<Uuid>, user_ids: Vec<Uuid>) -> SendNotificationDto {
        SendNotificationDto {
            title: "Collection drive".to_string(),
            message: "  Bins will be emptied on Sunday  ".to_string(),
            notification_type: NotificationType::ZoneAlert,
            delivery_method: DeliveryMethod::InApp,
            user_ids,
            zone_id,
            status: None,
            from_date: None,
            to_date: None,
        }
    }

    #[test]
    fn test_recipient_filter_pins_users_to_themselves() {
        let citizen = create_citizen();
        let someone_else = Uuid::new_v4();

        let principal = Principal::User(citizen.clone());
        assert_eq!(
            recipient_filter(&principal, Some(someone_else)),
            Some(citizen.id)
        );

        let admin = Principal::Admin(create_admin());
        assert_eq!(recipient_filter(&admin, Some(someone_else)), Some(someone_else));
        assert_eq!(recipient_filter(&admin, None), None);
    }

    #[tokio::test]
    async fn test_reversed_dates_fail_before_any_query() {
        let pool = lazy_pool();
        let service = NotificationService::new(pool.clone(), Arc::new(ZoneService::new(pool)));

        let result = service
            .send(SendNotificationDto {
                title: "Cleanup".to_string(),
                message: "Sunday".to_string(),
                notification_type: NotificationType::System,
                delivery_method: DeliveryMethod::InApp,
                user_ids: vec![],
                zone_id: None,
                status: None,
                from_date: chrono::NaiveDate::from_ymd_opt(2025, 5, 2),
                to_date: chrono::NaiveDate::from_ymd_opt(2025, 5, 1),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_derived_audience_notifies_each_owner_once(pool: PgPool) {
        let frequent = seed_user(&pool, "frequent@example.com").await;
        let elsewhere = seed_user(&pool, "elsewhere@example.com").await;
        let north = seed_zone(&pool, "North").await;
        let south = seed_zone(&pool, "South").await;
        for _ in 0..3 {
            seed_report(&pool, frequent, north, ReportStatus::Pending).await;
        }
        seed_report(&pool, elsewhere, south, ReportStatus::Pending).await;
        let service = service(&pool);

        let sent = service.send(send_dto(Some(north), vec![])).await.unwrap();

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, Some(frequent));
        assert_eq!(sent[0].zone_name.as_deref(), Some("North"));
        assert_eq!(sent[0].message, "Bins will be emptied on Sunday");
        assert_eq!(sent[0].notification_type, NotificationType::ZoneAlert);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_audience_creates_nothing(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let busy = seed_zone(&pool, "Busy").await;
        let quiet = seed_zone(&pool, "Quiet").await;
        seed_report(&pool, owner, busy, ReportStatus::Collected).await;
        let service = service(&pool);

        let result = service.send(send_dto(Some(quiet), vec![])).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("No target users")),
            other => panic!("expected a bad request, got {:?}", other),
        }
        assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM notifications").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_explicit_unknown_user_is_rejected(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let service = service(&pool);

        let result = service
            .send(send_dto(None, vec![owner, Uuid::new_v4()]))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM notifications").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_mark_read_keeps_first_read_time(pool: PgPool) {
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        let service = service(&pool);
        let sent = service.send(send_dto(None, vec![owner])).await.unwrap();
        let id = sent[0].id;

        let principal = citizen_principal(owner);
        assert_eq!(service.unread_count(&principal).await.unwrap(), 1);

        let first = service.mark_read(&principal, id).await.unwrap();
        let second = service.mark_read(&principal, id).await.unwrap();
        assert!(first.is_read);
        assert_eq!(first.read_at, second.read_at);
        assert_eq!(service.unread_count(&principal).await.unwrap(), 0);

        let result = service.mark_read(&citizen_principal(other), id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
