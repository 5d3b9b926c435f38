use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::zones::handlers;
use crate::features::zones::services::ZoneService;

/// Create routes for the zones feature
pub fn routes(service: Arc<ZoneService>) -> Router {
    Router::new()
        .route("/api/zones", get(handlers::list_zones))
        .route("/api/zones/{id}", get(handlers::get_zone))
        .route("/api/admin/zones", post(handlers::create_zone))
        .route(
            "/api/admin/zones/{id}",
            put(handlers::update_zone).delete(handlers::delete_zone),
        )
        .route("/api/admin/zones/{id}/places", post(handlers::add_place))
        .route(
            "/api/admin/zones/{id}/places/{place_id}",
            put(handlers::update_place).delete(handlers::delete_place),
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
        routes(Arc::new(ZoneService::new(lazy_pool())))
    }

    #[tokio::test]
    async fn test_citizen_cannot_create_zone() {
        let server = TestServer::new(with_citizen_auth(app())).unwrap();
        server
            .post("/api/admin/zones")
            .json(&json!({ "name": "Ward 9" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_zone_requires_name() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .post("/api/admin/zones")
            .json(&json!({ "name": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_place_type_is_rejected() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();
        server
            .post(&format!("/api/admin/zones/{}/places", uuid::Uuid::new_v4()))
            .json(&json!({ "name": "Gate", "placeType": "volcano" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
