//! VEVENT generation.

use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::ics::escape::escape_text;
use crate::ics::time::{format_utc, format_zoned};
use crate::schedule::{CalendarEvent, ScheduleRow};

/// Map one upstream row to its VEVENT lines, or `None` if the row is
/// unusable.
pub fn map_row(
    row: &ScheduleRow,
    subject: &str,
    generated_at: DateTime<Utc>,
    config: &FeedConfig,
) -> Option<Vec<String>> {
    let event = CalendarEvent::from_row(row, subject, config)?;
    Some(event_lines(&event, generated_at, config))
}

/// Unfolded VEVENT content lines for `event`.
pub fn event_lines(
    event: &CalendarEvent,
    generated_at: DateTime<Utc>,
    config: &FeedConfig,
) -> Vec<String> {
    let tz = config.timezone();
    let tzid = tz.name();

    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", event.uid),
        format!("DTSTAMP:{}", format_utc(generated_at)),
        format!("DTSTART;TZID={tzid}:{}", format_zoned(event.start, tz)),
        format!("DTEND;TZID={tzid}:{}", format_zoned(event.end, tz)),
        format!("SUMMARY:{}", escape_text(&event.summary)),
        "STATUS:CONFIRMED".to_string(),
        "SEQUENCE:0".to_string(),
    ];

    if let Some(ref location) = event.location {
        lines.push(format!("LOCATION:{}", escape_text(location)));
    }

    if let Some(ref description) = event.description {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }

    lines.push("END:VEVENT".to_string());
    lines
}
