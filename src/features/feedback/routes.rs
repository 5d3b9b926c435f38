use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::feedback::handlers;
use crate::features::feedback::services::FeedbackService;

/// Create routes for the feedback feature
pub fn routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route(
            "/api/feedback",
            get(handlers::list_my_feedback).post(handlers::create_feedback),
        )
        .route("/api/admin/feedback", get(handlers::list_feedback))
        .route(
            "/api/admin/feedback/{id}/resolve",
            patch(handlers::resolve_feedback),
        )
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

    fn app() -> Router {
        routes(Arc::new(FeedbackService::new(lazy_pool())))
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();
        server
            .post("/api/feedback")
            .json(&json!({ "subject": "Bins", "message": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_submit_feedback() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .post("/api/feedback")
            .json(&json!({ "message": "Great service" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_citizen_cannot_resolve_feedback() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();
        server
            .patch(&format!("/api/admin/feedback/{}/resolve", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .patch("/api/admin/feedback/not-a-uuid/resolve")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
