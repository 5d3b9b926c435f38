pub mod zone_handler;

pub use zone_handler::*;
