//! Upstream body in, calendar feed out.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::ics::calendar::assemble;
use crate::ics::event::map_row;
use crate::schedule::ScheduleRow;

/// A rendered feed and what went into it.
#[derive(Debug, Clone)]
pub struct Feed {
    pub ics: String,
    pub stats: FeedStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Rows received from upstream
    pub total: usize,
    /// Rows that became a VEVENT
    pub emitted: usize,
    /// Rows dropped as malformed
    pub skipped: usize,
}

/// Decode an upstream response body into its list of rows.
///
/// The body is read as UTF-8 first and, failing that, as Latin-1, since the
/// upstream does not reliably label its encoding.
pub fn parse_rows(body: &[u8]) -> FeedResult<Vec<Value>> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => {
            let latin1: String = body.iter().copied().map(char::from).collect();
            serde_json::from_str(&latin1)?
        }
    };

    match value {
        Value::Array(rows) => Ok(rows),
        other => Err(FeedError::NotAnArray(json_kind(&other))),
    }
}

/// Render `rows` as a calendar for `subject`.
///
/// `generated_at` becomes every DTSTAMP; callers capture it once per
/// request. Rows that cannot be turned into an event are skipped.
pub fn render_feed(
    rows: &[Value],
    subject: &str,
    generated_at: DateTime<Utc>,
    config: &FeedConfig,
) -> FeedResult<Feed> {
    let mut stats = FeedStats {
        total: rows.len(),
        ..FeedStats::default()
    };

    let mut events = Vec::with_capacity(rows.len());
    for (index, value) in rows.iter().enumerate() {
        let lines = ScheduleRow::from_value(value)
            .and_then(|row| map_row(&row, subject, generated_at, config));

        match lines {
            Some(lines) => {
                events.push(lines);
                stats.emitted += 1;
            }
            None => {
                debug!(index, "Skipping malformed schedule row");
                stats.skipped += 1;
            }
        }
    }

    let ics = assemble(events, config)?;
    Ok(Feed { ics, stats })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
