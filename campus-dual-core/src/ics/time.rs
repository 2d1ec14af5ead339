//! Timestamp formatting for DTSTAMP, DTSTART and DTEND.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Convert Unix seconds into an instant. `None` outside chrono's range.
pub fn from_epoch(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// `YYYYMMDDTHHMMSSZ`
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format(UTC_FORMAT).to_string()
}

/// Wall-clock time of `instant` in `tz` as `YYYYMMDDTHHMMSS`, to be paired
/// with a `TZID` parameter.
///
/// The offset is resolved by chrono-tz for the date of the instant itself,
/// so events on either side of a DST switch get their own offset.
pub fn format_zoned(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(LOCAL_FORMAT).to_string()
}
