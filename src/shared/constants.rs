/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ANALYTICS
// =============================================================================

/// Default number of zones returned by the top-zones rollup
pub const DEFAULT_TOP_ZONES_LIMIT: i64 = 5;

/// Trailing window of the eco points chart, today included
pub const ECO_POINTS_WINDOW_DAYS: i64 = 7;

// =============================================================================
// AUTH
// =============================================================================

/// Subject claim carried by admin tokens
pub const ADMIN_SUBJECT: &str = "admin";

/// bcrypt work factor for stored password hashes
pub const PASSWORD_HASH_COST: u32 = 10;
