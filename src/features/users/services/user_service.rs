use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{AdminUpdateUserDto, UpdateProfileDto, UserQueryParams};
use crate::features::users::models::{CreateUser, User, UserRole};
use crate::shared::validation::clean_optional;

const USER_COLUMNS: &str = r#"
    id, name, email, phone, address, password_hash,
    role, is_active, created_at, updated_at
"#;

/// Service for user account storage
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user; duplicate email is a conflict
    pub async fn create(&self, data: &CreateUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, phone, address, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.address)
            .bind(&data.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if AppError::is_unique_violation(&e) {
                    return AppError::Conflict("Email is already registered".to_string());
                }
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Created user: {}", user.id);
        Ok(user)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find user by email: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Find user by ID, `None` if absent
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Update the caller's own profile fields; absent fields are left as-is
    pub async fn update_profile(&self, id: Uuid, dto: UpdateProfileDto) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(clean_optional(dto.name))
            .bind(clean_optional(dto.phone))
            .bind(clean_optional(dto.address))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("Updated profile for user: {}", id);
        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update password: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("Password changed for user: {}", id);
        Ok(())
    }

    /// List users with optional filters (admin)
    /// Returns (users, total_count)
    pub async fn list(&self, params: &UserQueryParams) -> Result<(Vec<User>, i64)> {
        let pagination = params.pagination();

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut count_query, params);

        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        push_user_filters(&mut query, params);
        query
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(pagination.offset())
            .push(" LIMIT ")
            .push_bind(pagination.limit());

        let users = query
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }

    /// Admin change of role and/or active flag
    pub async fn admin_update(&self, id: Uuid, dto: &AdminUpdateUserDto) -> Result<User> {
        if dto.role.is_none() && dto.is_active.is_none() {
            return Err(AppError::Validation(
                "Provide at least one of role or isActive".to_string(),
            ));
        }

        let sql = format!(
            r#"
            UPDATE users
            SET role = COALESCE($2, role),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(dto.role)
            .bind(dto.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!(
            "Admin updated user {}: role={}, active={}",
            user.id,
            user.role,
            user.is_active
        );
        Ok(user)
    }

    /// Count registered users, optionally by role
    pub async fn count(&self, role: Option<UserRole>) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })
    }
}

fn push_user_filters(query: &mut QueryBuilder<'_, Postgres>, params: &UserQueryParams) {
    if let Some(role) = params.role {
        query.push(" AND role = ").push_bind(role);
    }
    if let Some(is_active) = params.is_active {
        query.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        query
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
