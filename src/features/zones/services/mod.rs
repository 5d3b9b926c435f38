mod zone_service;

pub use zone_service::ZoneService;
