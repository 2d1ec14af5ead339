//! Time window requested from Campus Dual.

use chrono::{DateTime, Duration, Utc};

/// How far back the feed reaches, so the current week stays complete
pub const LOOKBACK_DAYS: i64 = 14;
/// A "month" of lookahead is a flat 30 days
pub const DAYS_PER_MONTH: i64 = 30;
pub const DEFAULT_MONTHS: f64 = 3.0;

/// Start and end of the requested schedule, in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: i64,
    pub end: i64,
}

impl FetchWindow {
    /// Window from two weeks before `now` to `months` 30-day months after it.
    /// Fractional months are allowed.
    pub fn around(now: DateTime<Utc>, months: f64) -> Self {
        let now = now.timestamp();
        let month_secs = Duration::days(DAYS_PER_MONTH).num_seconds() as f64;
        let ahead = (month_secs * months) as i64;

        FetchWindow {
            start: now - Duration::days(LOOKBACK_DAYS).num_seconds(),
            end: now.saturating_add(ahead),
        }
    }
}

/// Parse the lookahead in months.
/// Missing, non-numeric or negative values fall back to [`DEFAULT_MONTHS`].
pub fn parse_months(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|m| m.is_finite() && *m >= 0.0)
        .unwrap_or(DEFAULT_MONTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DAY: i64 = 86_400;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_window() {
        let window = FetchWindow::around(now(), DEFAULT_MONTHS);
        let now = now().timestamp();

        assert_eq!(window.start, now - 14 * DAY);
        assert_eq!(window.end, now + 90 * DAY);
    }

    #[test]
    fn test_fractional_months() {
        let window = FetchWindow::around(now(), 0.5);
        assert_eq!(window.end, now().timestamp() + 15 * DAY);
    }

    #[test]
    fn test_zero_months_ends_now() {
        let window = FetchWindow::around(now(), 0.0);
        assert_eq!(window.end, now().timestamp());
        assert!(window.start < window.end);
    }

    #[test]
    fn test_parse_months() {
        assert_eq!(parse_months(Some("6")), 6.0);
        assert_eq!(parse_months(Some(" 1.5 ")), 1.5);
        assert_eq!(parse_months(Some("0")), 0.0);
    }

    #[test]
    fn test_parse_months_falls_back() {
        for raw in [None, Some(""), Some("abc"), Some("-2"), Some("NaN"), Some("inf")] {
            assert_eq!(parse_months(raw), DEFAULT_MONTHS, "input {raw:?}");
        }
    }
}
