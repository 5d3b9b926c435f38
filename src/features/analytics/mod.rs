//! Admin dashboard aggregations over waste reports.
//!
//! Grouping and summing happen in SQL. Ranking, tie-breaks, gap filling and
//! percentages live in [`services::rollup`].

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AnalyticsService;
