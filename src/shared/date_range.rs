//! Calendar-day filters resolved against the server's local timezone.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};

use crate::core::error::{AppError, Result};

/// Half-open `[start, end)` instant range for SQL filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Turn inclusive calendar dates into instants.
///
/// `from` starts at local midnight, `to` runs through the end of that day.
pub fn day_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<DateBounds> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::BadRequest(
                "from_date must not be after to_date".to_string(),
            ));
        }
    }

    let start = from.map(start_of_local_day).transpose()?;
    let end = to
        .map(|d| {
            d.checked_add_days(Days::new(1))
                .ok_or_else(|| AppError::BadRequest("to_date is out of range".to_string()))
                .and_then(start_of_local_day)
        })
        .transpose()?;

    Ok(DateBounds { start, end })
}

/// Local midnight of `date` as a UTC instant
pub fn start_of_local_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::BadRequest(format!("{} has no local midnight", date)))
}
