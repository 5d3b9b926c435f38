use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/admin/auth/login", post(handlers::admin_login))
        .with_state(service)
}

/// Protected auth routes (require a bearer token)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .route("/api/users/me/password", put(handlers::change_password))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AdminConfig, AuthConfig};
    use crate::core::database::lazy_pool;
    use crate::features::auth::services::TokenService;
    use crate::features::users::services::UserService;
    use crate::shared::test_helpers::with_admin_auth;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn service() -> Arc<AuthService> {
        let token_service = Arc::new(TokenService::new(&AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "waste-report-test".to_string(),
            token_ttl: Duration::from_secs(600),
            jwt_leeway: Duration::from_secs(0),
        }));
        Arc::new(AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            token_service,
            AdminConfig {
                email: "admin@city.gov".to_string(),
                password: "s3cret-admin".to_string(),
                name: "City Admin".to_string(),
            },
        ))
    }

    #[tokio::test]
    async fn test_admin_login_returns_token() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post("/api/admin/auth/login")
            .json(&json!({ "email": "admin@city.gov", "password": "s3cret-admin" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["tokenType"], "Bearer");
        assert_eq!(body["data"]["user"]["principal"], "admin");
    }

    #[tokio::test]
    async fn test_admin_login_wrong_password_is_unauthorized() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post("/api/admin/auth/login")
            .json(&json!({ "email": "admin@city.gov", "password": "nope" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_payload() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({ "name": "A", "email": "bad", "password": "short" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_for_admin_does_not_touch_database() {
        let server = TestServer::new(with_admin_auth(protected_routes(service()))).unwrap();

        let response = server.get("/api/auth/me").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["principal"], "admin");
    }

    #[tokio::test]
    async fn test_admin_cannot_change_password() {
        let server = TestServer::new(with_admin_auth(protected_routes(service()))).unwrap();

        let response = server
            .put("/api/users/me/password")
            .json(&json!({ "currentPassword": "x", "newPassword": "long-enough" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
