//! Feed configuration.

use chrono_tz::Tz;

use crate::constants::{
    DEFAULT_CALENDAR_NAME, DEFAULT_FALLBACK_TITLE, DEFAULT_PRODUCT_ID, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_ROOM_SENTINELS,
};
use crate::error::{FeedError, FeedResult};
use crate::ics::vtimezone;

/// Everything about a feed that is not taken from the upstream rows.
///
/// The timezone can only be set through [`FeedConfig::new`] or
/// [`FeedConfig::set_timezone`], which reject zones we have no VTIMEZONE for.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    timezone: Tz,
    /// Room values that mean "no room"
    pub room_sentinels: Vec<String>,
    /// Summary for rows without title or text
    pub fallback_title: String,
    pub product_id: String,
    pub calendar_name: String,
    /// REFRESH-INTERVAL / X-PUBLISHED-TTL value
    pub refresh_interval: String,
}

impl FeedConfig {
    pub fn new(timezone: &str) -> FeedResult<Self> {
        let mut config = FeedConfig::default();
        config.set_timezone(timezone)?;
        Ok(config)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn set_timezone(&mut self, timezone: &str) -> FeedResult<()> {
        self.timezone = parse_timezone(timezone)?;
        Ok(())
    }

    /// Whether `room` is one of the "no room" placeholders.
    pub fn is_room_sentinel(&self, room: &str) -> bool {
        self.room_sentinels.iter().any(|s| s == room)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            timezone: chrono_tz::Europe::Berlin,
            room_sentinels: DEFAULT_ROOM_SENTINELS.iter().map(|s| s.to_string()).collect(),
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL.to_string(),
        }
    }
}

fn parse_timezone(name: &str) -> FeedResult<Tz> {
    let tz: Tz = name
        .trim()
        .parse()
        .map_err(|_| FeedError::UnsupportedTimezone(name.to_string()))?;

    if !vtimezone::is_supported(tz) {
        return Err(FeedError::UnsupportedTimezone(name.to_string()));
    }

    Ok(tz)
}
