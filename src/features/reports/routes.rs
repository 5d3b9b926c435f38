use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_my_reports).post(handlers::create_report),
        )
        .route("/api/reports/{id}", get(handlers::get_my_report))
        .route("/api/admin/reports", get(handlers::list_reports))
        .route("/api/admin/reports/{id}", get(handlers::get_report))
        .route(
            "/api/admin/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_pool;
    use crate::features::notifications::NotificationService;
    use crate::features::zones::ZoneService;
    use crate::shared::test_helpers::{with_admin_auth, with_citizen_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn app() -> Router {
        let pool = lazy_pool();
        let zone_service = Arc::new(ZoneService::new(pool.clone()));
        let notification_service = Arc::new(NotificationService::new(
            pool.clone(),
            Arc::clone(&zone_service),
        ));
        routes(Arc::new(ReportService::new(
            pool,
            zone_service,
            notification_service,
        )))
    }

    #[tokio::test]
    async fn test_invalid_status_is_bad_request() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();

        let response = server
            .patch(&format!("/api/admin/reports/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "Shipped" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_citizen_cannot_change_status() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();

        server
            .patch(&format!("/api/admin/reports/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "Verified" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_submit_reports() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();

        server
            .post("/api/reports")
            .json(&json!({ "wetKg": 1, "zoneId": Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_negative_weight_is_rejected_before_lookup() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();

        server
            .post("/api/reports")
            .json(&json!({ "wetKg": -3, "zoneId": Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reversed_date_filter_is_rejected() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();

        server
            .get("/api/admin/reports?from_date=2025-03-02&to_date=2025-03-01")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
