//! Date/time utilities for sheetboard.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Format a DateTime<Utc> to the specified timezone.
///
/// # Arguments
///
/// * `dt` - DateTime in UTC
/// * `timezone` - Timezone name (e.g., "Asia/Tokyo", "UTC")
/// * `format` - Output format string (e.g., "%Y/%m/%d %H:%M")
///
/// # Returns
///
/// Formatted datetime string. An unknown timezone falls back to UTC.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Format a DateTime<Utc> with the default display format.
pub fn format_utc_datetime_default(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, "%Y/%m/%d %H:%M")
}

/// Parse a timestamp cell from a sheet row.
///
/// Sheet cells arrive as strings; accepts RFC3339 first, then the plain
/// `YYYY-MM-DD HH:MM:SS` form (assumed UTC). Returns `None` when the
/// cell holds neither.
pub fn parse_row_datetime(cell: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    None
}
