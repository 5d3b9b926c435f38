//! Citizen feedback and its one-way resolution by the administrator.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FeedbackService;
