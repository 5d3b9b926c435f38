//! Principal guards for handlers.
//!
//! The auth middleware puts a [`Principal`] in the request extensions. These
//! extractors pull it back out and check which kind it is:
//! - `Principal`: any authenticated caller (citizen or administrator)
//! - `RequireUser`: citizen accounts only
//! - `RequireAdmin`: the configured administrator only
//!
//! The two principal kinds are disjoint. An administrator token never passes
//! `RequireUser` and no citizen account, whatever its role, passes `RequireAdmin`.

use crate::core::error::AppError;
use crate::features::auth::model::{AdminPrincipal, AuthenticatedUser, Principal};
use axum::{extract::FromRequestParts, http::request::Parts};

fn principal_from_parts(parts: &Parts) -> Result<Principal, AppError> {
    parts
        .extensions
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_parts(parts)
    }
}

/// Guard for citizen-only endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireUser(user): RequireUser) { ... }
/// ```
pub struct RequireUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match principal_from_parts(parts)? {
            Principal::User(user) => Ok(RequireUser(user)),
            Principal::Admin(_) => Err(AppError::Forbidden(
                "This action requires a user account".to_string(),
            )),
        }
    }
}

/// Guard for administrator-only endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(admin): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AdminPrincipal);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match principal_from_parts(parts)? {
            Principal::Admin(admin) => Ok(RequireAdmin(admin)),
            Principal::User(_) => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin, create_citizen, with_principal};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn user_only(RequireUser(user): RequireUser) -> String {
        user.email
    }

    async fn admin_only(RequireAdmin(admin): RequireAdmin) -> String {
        admin.email
    }

    async fn anyone(principal: Principal) -> String {
        principal.actor()
    }

    fn router() -> Router {
        Router::new()
            .route("/user", get(user_only))
            .route("/admin", get(admin_only))
            .route("/any", get(anyone))
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        server
            .get("/any")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_cannot_use_citizen_endpoints() {
        let server =
            TestServer::new(with_principal(router(), Principal::Admin(create_admin()))).unwrap();

        server.get("/admin").await.assert_status_ok();
        server.get("/any").await.assert_status_ok();
        server
            .get("/user")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_citizen_cannot_use_admin_endpoints() {
        let citizen = create_citizen();
        let server =
            TestServer::new(with_principal(router(), Principal::User(citizen.clone()))).unwrap();

        let response = server.get("/user").await;
        response.assert_status_ok();
        response.assert_text(citizen.email);
        server
            .get("/admin")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
