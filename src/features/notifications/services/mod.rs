pub mod audience;
mod notification_service;
pub mod status_text;

pub use notification_service::NotificationService;
