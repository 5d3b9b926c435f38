//! In-app notifications: admin broadcasts, automatic status-change messages
//! and per-user read state.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::NotificationService;
