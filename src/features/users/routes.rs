use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users/me",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/admin/users", get(handlers::list_users))
        .route("/api/admin/users/{id}", patch(handlers::update_user))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_pool;
    use crate::shared::test_helpers::{with_admin_auth, with_citizen_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn app() -> Router {
        routes(Arc::new(UserService::new(lazy_pool())))
    }

    #[tokio::test]
    async fn test_citizen_cannot_list_users() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();
        server
            .get("/api/admin/users")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_has_no_profile() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .get("/api/users/me")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_invalid_phone() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();
        server
            .put("/api/users/me")
            .json(&json!({ "phone": "not a phone" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_update_requires_a_field() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .patch(&format!("/api/admin/users/{}", Uuid::new_v4()))
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
