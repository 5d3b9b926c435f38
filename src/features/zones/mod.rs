//! Collection zones and the places (bins, drop-off points) inside them.
//!
//! Reports copy the zone and place names at creation time, so renaming or
//! removing a place here never rewrites history.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ZoneService;
