//! Synoptic time handling for storm observations.
//!
//! Deck files carry 6-hourly synoptic timestamps as `YYYYMMDDHH`; sector
//! records carry ISO-8601 instants. Product metadata stores datetimes in
//! the C locale text form (`%c`) and parses them back.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::error::TimeParseError;

/// Standard ATCF observation cadence in hours.
pub const SYNOPTIC_STEP_HOURS: i64 = 6;

/// Parse a `YYYYMMDDHH` synoptic timestamp.
pub fn parse_synoptic(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let trimmed = s.trim();
    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimeParseError::InvalidFormat(s.to_string()));
    }
    let ndt = NaiveDateTime::parse_from_str(&format!("{trimmed}0000"), "%Y%m%d%H%M%S")
        .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;
    Ok(Utc.from_utc_datetime(&ndt))
}

/// Format an instant back to `YYYYMMDDHH`.
pub fn format_synoptic(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d%H").to_string()
}

/// Format an instant as the compact `YYYYMMDDTHHZ` form used in sector
/// descriptions and catalog file names.
pub fn format_compact(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%HZ").to_string()
}

/// Validity window for a synoptic fix: `[t, t + 6h)`.
pub fn validity_window(start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (start, start + Duration::hours(SYNOPTIC_STEP_HOURS))
}

/// Parse an ISO-8601 instant, accepting a missing timezone as UTC.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }
    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Parse the C locale text form produced by `dt.format("%c")`.
pub fn parse_ctime(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let ndt = NaiveDateTime::parse_from_str(s, "%c")
        .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;
    Ok(Utc.from_utc_datetime(&ndt))
}
