mod analytics_service;
pub mod rollup;

pub use analytics_service::AnalyticsService;
