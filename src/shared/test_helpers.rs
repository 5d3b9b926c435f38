use crate::features::auth::model::{AdminPrincipal, AuthenticatedUser, Principal};
use crate::features::reports::models::ReportStatus;
use crate::features::users::models::UserRole;

use axum::{extract::Request, middleware::Next, Router};
use sqlx::PgPool;
use uuid::Uuid;

pub fn create_citizen() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        name: "Test Citizen".to_string(),
        email: "citizen@example.com".to_string(),
        role: UserRole::User,
    }
}

pub fn create_admin() -> AdminPrincipal {
    AdminPrincipal {
        email: "admin@example.com".to_string(),
        name: "Test Admin".to_string(),
    }
}

/// Wrap a router so every request carries the given principal, bypassing token checks
pub fn with_principal(router: Router, principal: Principal) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let principal = principal.clone();
            async move {
                request.extensions_mut().insert(principal);
                next.run(request).await
            }
        },
    ))
}

/// Citizen-authenticated router
pub fn with_citizen_auth(router: Router) -> Router {
    with_principal(router, Principal::User(create_citizen()))
}

/// Admin-authenticated router
pub fn with_admin_auth(router: Router) -> Router {
    with_principal(router, Principal::Admin(create_admin()))
}

// ============================================================================
// Database seeding for #[sqlx::test] cases
// ============================================================================

/// Insert a citizen and return its id
pub async fn seed_user(pool: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, 'not-a-hash') RETURNING id",
    )
    .bind("Seeded Citizen")
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("seed user")
}

/// Insert an active zone and return its id
pub async fn seed_zone(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO zones (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("seed zone")
}

/// Insert a report owned by `user_id` in `zone_id` with the given status
pub async fn seed_report(
    pool: &PgPool,
    user_id: Uuid,
    zone_id: Uuid,
    status: ReportStatus,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO waste_reports (user_id, zone_id, zone_name, wet_kg, status)
        SELECT $1, id, name, 1.5, $3 FROM zones WHERE id = $2
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(zone_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("seed report")
}

/// Principal for a seeded citizen
pub fn citizen_principal(user_id: Uuid) -> Principal {
    Principal::User(AuthenticatedUser {
        id: user_id,
        name: "Seeded Citizen".to_string(),
        email: "seeded@example.com".to_string(),
        role: UserRole::User,
    })
}

pub async fn count_rows(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .expect("count rows")
}
