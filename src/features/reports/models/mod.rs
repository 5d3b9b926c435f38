mod generator;
mod report;

pub use generator::{GeneratorProfile, GeneratorType};
pub use report::{CreateReport, ReportStatus, StatusChange, WasteReport};
