use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Human-readable display format, e.g. `October 19, 2026 3:04 PM`.
pub const DISPLAY_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

/// Render an instant the way clients show it next to a message.
pub fn display_time(instant: &DateTime<Utc>) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}

/// Encode an instant for storage. Fixed width, so text order matches time order.
pub fn to_stored(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored instant.
///
/// Accepts RFC 3339 as written by [`to_stored`] and SQLite's own
/// `datetime('now')` layout, which has no timezone and is taken as UTC.
pub fn parse_stored(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}
