//! Upstream timetable rows and the events derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::FeedConfig;
use crate::constants::{UID_DOMAIN, UID_FALLBACK_TITLE, UID_SLUG_LEN};
use crate::ics::time::from_epoch;
use crate::text::repair_mojibake;

/// One entry of the Campus Dual `/room/json` response.
///
/// Campus Dual is not consistent about field names (`title` vs `text`,
/// `room` vs `sroom`) or types, so every field is optional and scalar values
/// of the wrong JSON type are read leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRow {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end: Option<i64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sroom: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub instructor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sinstructor: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub remarks: Option<String>,
}

impl ScheduleRow {
    /// Read a row out of a JSON value. Anything that is not an object is
    /// not a row.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        ScheduleRow::deserialize(value).ok()
    }

    /// Start and end, if both are present and non-zero.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start != 0 && end != 0 => Some((start, end)),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        first_present(&self.title, &self.text)
    }

    pub fn room(&self) -> Option<&str> {
        first_present(&self.room, &self.sroom)
    }

    pub fn instructor(&self) -> Option<&str> {
        first_present(&self.instructor, &self.sinstructor)
    }
}

/// A schedule row projected onto calendar concepts, with all text repaired
/// but not yet escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl CalendarEvent {
    /// Build the event for `row`, or `None` if the row is unusable
    /// (missing, zero, unrepresentable or inverted time range).
    pub fn from_row(row: &ScheduleRow, subject: &str, config: &FeedConfig) -> Option<Self> {
        let (start_secs, end_secs) = row.time_range()?;
        if start_secs > end_secs {
            return None;
        }
        let start = from_epoch(start_secs)?;
        let end = from_epoch(end_secs)?;

        let summary = repair_mojibake(row.title().unwrap_or(&config.fallback_title)).into_owned();

        let location = row
            .room()
            .map(|room| repair_mojibake(room).into_owned())
            .filter(|room| !room.trim().is_empty() && !config.is_room_sentinel(room));

        let description = compose_description(row, &summary);

        // Untitled rows get a fixed slug, whatever the displayed fallback is
        let uid_title = match row.title() {
            Some(title) => repair_mojibake(title),
            None => UID_FALLBACK_TITLE.into(),
        };

        Some(CalendarEvent {
            uid: event_uid(subject, start_secs, end_secs, &uid_title),
            start,
            end,
            summary,
            location,
            description,
        })
    }
}

/// Stable identifier: the same subject, times and title always give the same
/// UID, so clients update events across refreshes instead of duplicating them.
///
/// The subject comes from the request; control characters are dropped so it
/// cannot break out of the UID content line.
pub fn event_uid(subject: &str, start: i64, end: i64, title: &str) -> String {
    let subject: String = subject.chars().filter(|c| !c.is_control()).collect();
    let slug: String = title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(UID_SLUG_LEN)
        .collect();
    let slug = if slug.is_empty() { "event" } else { &slug };

    format!("{subject}-{start}-{end}-{slug}@{UID_DOMAIN}")
}

/// Description, lecturer and remarks, one per line. `None` if all are blank.
fn compose_description(row: &ScheduleRow, summary: &str) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(description) = row.description.as_deref().map(repair_mojibake) {
        if !description.trim().is_empty() && description != summary {
            parts.push(description.into_owned());
        }
    }

    if let Some(instructor) = row.instructor().map(repair_mojibake) {
        if !instructor.trim().is_empty() {
            parts.push(format!("Dozent: {instructor}"));
        }
    }

    if let Some(remarks) = row.remarks.as_deref().map(repair_mojibake) {
        if !remarks.trim().is_empty() {
            parts.push(format!("Bemerkung: {remarks}"));
        }
    }

    (!parts.is_empty()).then(|| parts.join("\n"))
}

/// First of the two alternatives that is present and not empty.
fn first_present<'a>(primary: &'a Option<String>, secondary: &'a Option<String>) -> Option<&'a str> {
    [primary, secondary]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .find(|v| !v.is_empty())
}

/// Accepts integers, integral floats and numeric strings; anything else is
/// treated as missing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts strings, numbers and booleans as text; null and containers are
/// treated as missing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> ScheduleRow {
        ScheduleRow::from_value(&value).unwrap()
    }

    #[test]
    fn test_reads_campus_dual_row() {
        let row = row(json!({
            "title": "Mathematik",
            "start": 1700000000,
            "end": 1700003600,
            "allDay": false,
            "description": "Analysis I",
            "color": "#ff0000",
            "editable": false,
            "room": "A1.02",
            "sroom": "A1.02",
            "instructor": "Prof. Dr. Muster",
            "sinstructor": "Muster",
            "remarks": ""
        }));

        assert_eq!(row.time_range(), Some((1700000000, 1700003600)));
        assert_eq!(row.title(), Some("Mathematik"));
        assert_eq!(row.room(), Some("A1.02"));
        assert_eq!(row.instructor(), Some("Prof. Dr. Muster"));
    }

    #[test]
    fn test_lenient_field_types() {
        let row = row(json!({
            "start": "1700000000",
            "end": 1700003600.0,
            "title": null,
            "text": 42,
            "room": ["not", "text"]
        }));

        assert_eq!(row.time_range(), Some((1700000000, 1700003600)));
        assert_eq!(row.title(), Some("42"));
        assert_eq!(row.room(), None);
    }

    #[test]
    fn test_non_object_is_not_a_row() {
        assert!(ScheduleRow::from_value(&json!(null)).is_none());
        assert!(ScheduleRow::from_value(&json!("row")).is_none());
        assert!(ScheduleRow::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_falsy_times_have_no_range() {
        assert_eq!(row(json!({"start": 0, "end": 1700003600})).time_range(), None);
        assert_eq!(row(json!({"start": 1700000000})).time_range(), None);
        assert_eq!(row(json!({"start": "soon", "end": 1700003600})).time_range(), None);
    }

    #[test]
    fn test_empty_primary_falls_back_to_secondary() {
        let row = row(json!({"title": "", "text": "Unterricht", "room": "", "sroom": "B2"}));
        assert_eq!(row.title(), Some("Unterricht"));
        assert_eq!(row.room(), Some("B2"));
    }

    #[test]
    fn test_event_uid_format() {
        assert_eq!(
            event_uid("123", 1700000000, 1700003600, "Mathe, Übung"),
            "123-1700000000-1700003600-MatheÜbung@campus-dual"
        );
    }

    #[test]
    fn test_event_uid_truncates_and_falls_back() {
        let uid = event_uid("1", 10, 20, "Software Engineering und Projektmanagement II");
        assert_eq!(uid, "1-10-20-SoftwareEngineeringundPr@campus-dual");

        assert_eq!(event_uid("1", 10, 20, "--- / ---"), "1-10-20-event@campus-dual");
    }

    #[test]
    fn test_event_uid_drops_control_characters() {
        let uid = event_uid("1\r\nSTATUS:CANCELLED\r\nX", 10, 20, "Mathe");
        assert!(!uid.contains(['\r', '\n']), "subject leaked a line break into {uid:?}");
        assert_eq!(uid, "1STATUS:CANCELLEDX-10-20-Mathe@campus-dual");

        assert_eq!(event_uid("12\u{0}3\t", 10, 20, "Mathe"), "123-10-20-Mathe@campus-dual");
    }

    #[test]
    fn test_uid_fallback_ignores_configured_title() {
        let mut config = FeedConfig::default();
        config.fallback_title = "Termin".to_string();
        let event = CalendarEvent::from_row(&row(json!({"start": 10, "end": 20})), "7", &config)
            .unwrap();

        assert_eq!(event.summary, "Termin");
        assert_eq!(event.uid, "7-10-20-Unterricht@campus-dual");
    }

    #[test]
    fn test_from_row_uses_fallback_title() {
        let config = FeedConfig::default();
        let event = CalendarEvent::from_row(&row(json!({"start": 10, "end": 20})), "7", &config)
            .unwrap();

        assert_eq!(event.summary, "Vorlesung");
        assert_eq!(event.uid, "7-10-20-Unterricht@campus-dual");
        assert_eq!(event.location, None);
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_from_row_skips_inverted_range() {
        let config = FeedConfig::default();
        let inverted = row(json!({"start": 1700003600, "end": 1700000000, "title": "X"}));
        assert!(CalendarEvent::from_row(&inverted, "1", &config).is_none());

        let instant = row(json!({"start": 1700000000, "end": 1700000000, "title": "X"}));
        assert!(CalendarEvent::from_row(&instant, "1", &config).is_some());
    }

    #[test]
    fn test_from_row_suppresses_sentinel_rooms() {
        let config = FeedConfig::default();
        for room in ["---", "Ohne", "   "] {
            let event = CalendarEvent::from_row(
                &row(json!({"start": 10, "end": 20, "room": room})),
                "1",
                &config,
            )
            .unwrap();
            assert_eq!(event.location, None, "room {room:?} should be suppressed");
        }
    }

    #[test]
    fn test_from_row_composes_description() {
        let config = FeedConfig::default();
        let event = CalendarEvent::from_row(
            &row(json!({
                "start": 10,
                "end": 20,
                "title": "Mathe",
                "description": "Klausurvorbereitung",
                "sinstructor": "Muster",
                "remarks": "Bitte Taschenrechner mitbringen"
            })),
            "1",
            &config,
        )
        .unwrap();

        assert_eq!(
            event.description.as_deref(),
            Some("Klausurvorbereitung\nDozent: Muster\nBemerkung: Bitte Taschenrechner mitbringen")
        );
    }

    #[test]
    fn test_from_row_drops_description_equal_to_title() {
        let config = FeedConfig::default();
        let event = CalendarEvent::from_row(
            &row(json!({"start": 10, "end": 20, "title": "Mathe", "description": "Mathe", "remarks": " "})),
            "1",
            &config,
        )
        .unwrap();

        assert_eq!(event.description, None);
    }

    #[test]
    fn test_from_row_repairs_text_fields() {
        let config = FeedConfig::default();
        let mangle = |s: &str| s.bytes().map(char::from).collect::<String>();
        let event = CalendarEvent::from_row(
            &row(json!({
                "start": 10,
                "end": 20,
                "title": mangle("Übung"),
                "room": mangle("Hörsaal 1"),
                "instructor": mangle("Prof. Müller")
            })),
            "1",
            &config,
        )
        .unwrap();

        assert_eq!(event.summary, "Übung");
        assert_eq!(event.uid, "1-10-20-Übung@campus-dual");
        assert_eq!(event.location.as_deref(), Some("Hörsaal 1"));
        assert_eq!(event.description.as_deref(), Some("Dozent: Prof. Müller"));
    }
}
