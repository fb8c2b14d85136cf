//! Timestamp utilities

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a decoder timestamp into UTC
///
/// Accepts RFC 3339 (`2024-06-01T12:00:00Z`), ISO 8601 with a compact
/// offset (`2024-06-01T12:00:00+0000`) and the decoder's default
/// `2024-06-01 12:00:00` form, which carries no zone and is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
