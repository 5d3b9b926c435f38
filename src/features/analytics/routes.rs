use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Create routes for the analytics feature
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route(
            "/api/admin/analytics/zone-totals",
            get(handlers::zone_totals),
        )
        .route(
            "/api/admin/analytics/category-by-zone",
            get(handlers::category_by_zone),
        )
        .route("/api/admin/analytics/top-zones", get(handlers::top_zones))
        .route(
            "/api/admin/analytics/category-high-low",
            get(handlers::category_high_low),
        )
        .route(
            "/api/admin/analytics/eco-points-distribution",
            get(handlers::eco_points_distribution),
        )
        .route(
            "/api/admin/analytics/top-categories",
            get(handlers::top_categories),
        )
        .route("/api/admin/analytics/summary", get(handlers::summary))
        .with_state(service)
}
