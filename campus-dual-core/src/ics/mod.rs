//! ICS text generation.
//!
//! This module produces RFC 5545 output line by line. Each piece is a small
//! pure function so it can be tested on its own:
//! - `escape`: TEXT value escaping
//! - `time`: UTC and zoned timestamp formatting
//! - `fold`: 75-octet line folding
//! - `vtimezone`: embedded timezone definitions
//! - `event`: VEVENT lines for one event
//! - `calendar`: the surrounding VCALENDAR

pub mod calendar;
pub mod escape;
pub mod event;
pub mod fold;
pub mod time;
pub mod vtimezone;

pub use calendar::assemble;
pub use escape::escape_text;
pub use event::{event_lines, map_row};
pub use fold::{fold_line, fold_lines};
pub use time::{format_utc, format_zoned};
