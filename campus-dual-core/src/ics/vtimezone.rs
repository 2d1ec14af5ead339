//! Embedded VTIMEZONE definitions.
//!
//! Calendar clients need the zone rules in the feed to resolve
//! `DTSTART;TZID=...` values. Only zones following the current Central
//! European rules are supported: CET (+01:00) in winter, CEST (+02:00) from
//! the last Sunday of March to the last Sunday of October.

use chrono_tz::Tz;
use chrono_tz::Europe;
use indoc::formatdoc;

/// Zones whose current rules match [`central_european`].
const CENTRAL_EUROPEAN_ZONES: &[Tz] = &[
    Europe::Berlin,
    Europe::Vienna,
    Europe::Zurich,
    Europe::Amsterdam,
    Europe::Brussels,
    Europe::Paris,
    Europe::Luxembourg,
    Europe::Copenhagen,
    Europe::Oslo,
    Europe::Stockholm,
    Europe::Prague,
    Europe::Warsaw,
    Europe::Budapest,
    Europe::Madrid,
    Europe::Rome,
];

pub fn is_supported(tz: Tz) -> bool {
    CENTRAL_EUROPEAN_ZONES.contains(&tz)
}

/// VTIMEZONE lines for `tz`, or `None` if the zone is not supported.
pub fn vtimezone_lines(tz: Tz) -> Option<Vec<String>> {
    is_supported(tz).then(|| central_european(tz.name()))
}

fn central_european(tzid: &str) -> Vec<String> {
    formatdoc! {"
        BEGIN:VTIMEZONE
        TZID:{tzid}
        X-LIC-LOCATION:{tzid}
        BEGIN:DAYLIGHT
        TZOFFSETFROM:+0100
        TZOFFSETTO:+0200
        TZNAME:CEST
        DTSTART:19700329T020000
        RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU
        END:DAYLIGHT
        BEGIN:STANDARD
        TZOFFSETFROM:+0200
        TZOFFSETTO:+0100
        TZNAME:CET
        DTSTART:19701025T030000
        RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU
        END:STANDARD
        END:VTIMEZONE
    "}
    .lines()
    .map(str::to_string)
    .collect()
}
