mod zone;

pub use zone::{Place, PlaceType, Zone};
