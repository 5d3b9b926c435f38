//! Authentication for citizens and the administrator.
//!
//! Citizens register and log in with email and password; their tokens resolve
//! to a `users` row on every request. The administrator is defined entirely by
//! configuration and receives a token of its own kind.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, TokenService};
