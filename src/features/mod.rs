pub mod analytics;
pub mod auth;
pub mod feedback;
pub mod notifications;
pub mod reports;
pub mod users;
pub mod zones;
