use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::feedback::{dtos as feedback_dtos, handlers as feedback_handlers};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
    models as notifications_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::features::zones::{
    dtos as zones_dtos, handlers as zones_handlers, models as zones_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::admin_login,
        auth_handlers::get_me,
        auth_handlers::change_password,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::list_users,
        users_handlers::update_user,
        // Zones
        zones_handlers::list_zones,
        zones_handlers::get_zone,
        zones_handlers::create_zone,
        zones_handlers::update_zone,
        zones_handlers::delete_zone,
        zones_handlers::add_place,
        zones_handlers::update_place,
        zones_handlers::delete_place,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_my_reports,
        reports_handlers::get_my_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::unread_count,
        notifications_handlers::mark_read,
        notifications_handlers::send_notification,
        // Analytics (admin)
        analytics_handlers::zone_totals,
        analytics_handlers::category_by_zone,
        analytics_handlers::top_zones,
        analytics_handlers::category_high_low,
        analytics_handlers::eco_points_distribution,
        analytics_handlers::top_categories,
        analytics_handlers::summary,
        // Feedback
        feedback_handlers::create_feedback,
        feedback_handlers::list_my_feedback,
        feedback_handlers::list_feedback,
        feedback_handlers::resolve_feedback,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_model::AdminPrincipal,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AdminLoginRequestDto,
            auth_dtos::MeResponseDto,
            auth_dtos::AuthResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserResponseDto,
            users_dtos::UpdateProfileDto,
            users_dtos::ChangePasswordDto,
            users_dtos::AdminUpdateUserDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Zones
            zones_models::PlaceType,
            zones_dtos::PlaceResponseDto,
            zones_dtos::ZoneResponseDto,
            zones_dtos::CreatePlaceDto,
            zones_dtos::CreateZoneDto,
            zones_dtos::UpdateZoneDto,
            zones_dtos::UpdatePlaceDto,
            ApiResponse<zones_dtos::ZoneResponseDto>,
            ApiResponse<Vec<zones_dtos::ZoneResponseDto>>,
            ApiResponse<zones_dtos::PlaceResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::GeneratorType,
            reports_models::GeneratorProfile,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateStatusDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Notifications
            notifications_models::NotificationType,
            notifications_models::DeliveryMethod,
            notifications_dtos::SendNotificationDto,
            notifications_dtos::NotificationResponseDto,
            notifications_dtos::SendNotificationResponseDto,
            notifications_dtos::UnreadCountDto,
            ApiResponse<notifications_dtos::NotificationResponseDto>,
            ApiResponse<Vec<notifications_dtos::NotificationResponseDto>>,
            ApiResponse<notifications_dtos::SendNotificationResponseDto>,
            ApiResponse<notifications_dtos::UnreadCountDto>,
            // Analytics
            analytics_dtos::WasteCategory,
            analytics_dtos::ZoneTotalDto,
            analytics_dtos::CategoryByZoneDto,
            analytics_dtos::CategoryValueDto,
            analytics_dtos::CategoryHighLowDto,
            analytics_dtos::EcoPointsDayDto,
            analytics_dtos::CategoryShareDto,
            analytics_dtos::AnalyticsSummaryDto,
            ApiResponse<Vec<analytics_dtos::ZoneTotalDto>>,
            ApiResponse<Vec<analytics_dtos::CategoryByZoneDto>>,
            ApiResponse<Vec<analytics_dtos::CategoryHighLowDto>>,
            ApiResponse<Vec<analytics_dtos::EcoPointsDayDto>>,
            ApiResponse<Vec<analytics_dtos::CategoryShareDto>>,
            ApiResponse<analytics_dtos::AnalyticsSummaryDto>,
            // Feedback
            feedback_dtos::CreateFeedbackDto,
            feedback_dtos::FeedbackResponseDto,
            ApiResponse<feedback_dtos::FeedbackResponseDto>,
            ApiResponse<Vec<feedback_dtos::FeedbackResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Citizen and administrator authentication"),
        (name = "users", description = "Citizen profiles and admin user management"),
        (name = "zones", description = "Collection zones and their places"),
        (name = "reports", description = "Waste reports and the status workflow"),
        (name = "notifications", description = "In-app notifications"),
        (name = "analytics", description = "Admin dashboard aggregations"),
        (name = "feedback", description = "Citizen feedback"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Waste Report API",
        version = "0.1.0",
        description = "API documentation for the waste reporting service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
