//! VCALENDAR assembly.

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::ics::escape::escape_text;
use crate::ics::fold::fold_lines;
use crate::ics::vtimezone::vtimezone_lines;

/// Wrap already generated VEVENT blocks into a complete, folded calendar.
///
/// Events are written in the order given. Nothing is sorted or deduplicated.
/// Every content line, including the last, ends with CRLF.
pub fn assemble<I>(events: I, config: &FeedConfig) -> FeedResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let tz = config.timezone();
    let vtimezone =
        vtimezone_lines(tz).ok_or_else(|| FeedError::UnsupportedTimezone(tz.name().to_string()))?;

    // Configured values may carry TEXT specials or line breaks
    let refresh = escape_text(&config.refresh_interval);
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", escape_text(&config.product_id)),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(&config.calendar_name)),
        format!("X-WR-TIMEZONE:{}", tz.name()),
        format!("REFRESH-INTERVAL;VALUE=DURATION:{refresh}"),
        format!("X-PUBLISHED-TTL:{refresh}"),
    ];
    lines.extend(vtimezone);
    for event in events {
        lines.extend(event);
    }
    lines.push("END:VCALENDAR".to_string());

    let mut ics = fold_lines(&lines.join("\r\n"));
    ics.push_str("\r\n");
    Ok(ics)
}
