/// Zone used when nothing else is configured.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Summary used when a row carries neither `title` nor `text`.
pub const DEFAULT_FALLBACK_TITLE: &str = "Vorlesung";

/// Room values Campus Dual uses for "no room".
pub const DEFAULT_ROOM_SENTINELS: &[&str] = &["---", "Ohne"];

pub const DEFAULT_PRODUCT_ID: &str = "-//campus-dual//ics-proxy//DE";
pub const DEFAULT_CALENDAR_NAME: &str = "Campus Dual";

/// How often clients should re-fetch the feed (ISO 8601 duration).
pub const DEFAULT_REFRESH_INTERVAL: &str = "PT1H";

/// Domain part of every generated UID.
pub const UID_DOMAIN: &str = "campus-dual";

/// Title slugged into the UID of rows without a title.
pub const UID_FALLBACK_TITLE: &str = "Unterricht";

/// Maximum number of title characters that go into a UID.
pub const UID_SLUG_LEN: usize = 24;

/// RFC 5545 content line limit, in octets, excluding the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";
pub const FEED_FILENAME: &str = "campus-dual.ics";
