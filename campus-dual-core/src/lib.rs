//! Core of the Campus Dual calendar proxy.
//!
//! This crate turns the JSON timetable rows served by the Campus Dual portal
//! into an RFC 5545 calendar feed:
//! - `schedule` holds the upstream row type and the derived `CalendarEvent`
//! - `text` repairs double-encoded upstream strings
//! - `ics` contains escaping, timestamp formatting, line folding, the event
//!   mapper and the calendar assembler
//! - `feed` is the entry point tying it all together

pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod ics;
pub mod schedule;
pub mod text;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use feed::{Feed, FeedStats, parse_rows, render_feed};
pub use schedule::{CalendarEvent, ScheduleRow};
