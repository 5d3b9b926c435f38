use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::feedback::dtos::{CreateFeedbackDto, FeedbackQueryParams};
use crate::features::feedback::models::Feedback;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::clean_optional;

const FEEDBACK_COLUMNS: &str =
    "id, user_id, subject, message, is_resolved, resolved_at, created_at";

pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, dto: CreateFeedbackDto) -> Result<Feedback> {
        let message = dto.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }

        let sql = format!(
            r#"
            INSERT INTO feedback (user_id, subject, message)
            VALUES ($1, $2, $3)
            RETURNING {FEEDBACK_COLUMNS}
            "#
        );
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(user_id)
            .bind(clean_optional(dto.subject))
            .bind(message)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create feedback: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Feedback {} submitted by user {}", feedback.id, user_id);
        Ok(feedback)
    }

    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Feedback>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count feedback: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            r#"
            SELECT {FEEDBACK_COLUMNS} FROM feedback
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        );
        let items = sqlx::query_as::<_, Feedback>(&sql)
            .bind(user_id)
            .bind(pagination.offset())
            .bind(pagination.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list feedback by user: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    pub async fn list(&self, params: &FeedbackQueryParams) -> Result<(Vec<Feedback>, i64)> {
        let pagination = params.pagination();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM feedback WHERE ($1::boolean IS NULL OR is_resolved = $1)",
        )
        .bind(params.resolved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count feedback: {:?}", e);
            AppError::Database(e)
        })?;

        let sql = format!(
            r#"
            SELECT {FEEDBACK_COLUMNS} FROM feedback
            WHERE ($1::boolean IS NULL OR is_resolved = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        );
        let items = sqlx::query_as::<_, Feedback>(&sql)
            .bind(params.resolved)
            .bind(pagination.offset())
            .bind(pagination.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list feedback: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    /// Mark feedback resolved. Resolving twice keeps the first timestamp.
    pub async fn resolve(&self, id: Uuid) -> Result<Feedback> {
        let sql = format!(
            r#"
            UPDATE feedback
            SET is_resolved = TRUE, resolved_at = COALESCE(resolved_at, NOW())
            WHERE id = $1
            RETURNING {FEEDBACK_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve feedback: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Feedback {} not found", id)))
    }
}
