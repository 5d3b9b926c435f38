use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;

pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(handlers::unread_count),
        )
        .route("/api/notifications/{id}/read", patch(handlers::mark_read))
        .route(
            "/api/admin/notifications/send",
            post(handlers::send_notification),
        )
        .with_state(service)
}
