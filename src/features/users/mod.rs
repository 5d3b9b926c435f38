//! Citizen accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/me` | Caller's profile |
//! | PUT | `/api/users/me` | Update name, phone, address |
//! | GET | `/api/admin/users` | List accounts (admin) |
//! | PATCH | `/api/admin/users/{id}` | Change role or active flag (admin) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
