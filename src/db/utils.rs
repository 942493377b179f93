//! Timestamp helpers shared by models and adapters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::db::{DbResult, StoreError};

/// Date-only wire format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time wire format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current time truncated to whole seconds, the resolution every engine stores.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Format a timestamp with a strftime-style pattern.
pub fn format_timestamp(timestamp: &DateTime<Utc>, fmt: &str) -> String {
    timestamp.format(fmt).to_string()
}

/// Parse `text` strictly against `fmt`.
///
/// Date-only patterns yield midnight UTC. Input that does not match the whole
/// pattern is an error, never a zero timestamp.
pub fn parse_timestamp(text: &str, fmt: &str) -> DbResult<DateTime<Utc>> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, fmt) {
        return Ok(datetime.and_utc());
    }

    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| {
            StoreError::other(format!(
                "Malformed timestamp '{}' (expected format '{}')",
                text, fmt
            ))
        })
}

/// Convert stored unix seconds back into a timestamp.
pub fn from_unix_seconds(seconds: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| StoreError::other(format!("Timestamp {} is out of range", seconds)))
}
