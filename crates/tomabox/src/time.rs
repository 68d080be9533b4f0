//! Time utilities for tomabox.

use chrono::{DateTime, Local, TimeZone};

/// Format a timestamp the way console lines are stamped (`%x %X %:z`).
pub fn format_stamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%x %X %:z").to_string()
}

/// Current local time as a console stamp.
pub fn now_stamp() -> String {
    format_stamp(&Local::now())
}
