//! crates/shift_watch_core/src/time_window.rs
//!
//! Decides whether a shift's displayed start time falls inside a preference's window.

use crate::domain::Preference;
use chrono::{NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

static DISPLAY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*([AP]M)$").expect("display time pattern is valid")
});

/// Converts a portal time such as "9:00 AM" into minutes since midnight.
///
/// Returns `None` for anything that is not a well-formed 12-hour clock time.
pub fn display_minutes(display_time: &str) -> Option<u32> {
    let caps = DISPLAY_TIME.captures(display_time.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let pm = caps[3].eq_ignore_ascii_case("PM");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Some(hour * 60 + minute)
}

/// Parses a stored "HH:MM" (24-hour) bound into minutes since midnight.
pub fn clock_minutes(clock: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(clock.trim(), "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// True iff the shift starts within `[start, end]` of the preference.
///
/// Unparseable input on either side never matches. The preference's `days`
/// are not looked at here; see `availability::scan`.
pub fn matches(display_time: &str, preference: &Preference) -> bool {
    let (Some(shift), Some(start), Some(end)) = (
        display_minutes(display_time),
        clock_minutes(&preference.time_range_start),
        clock_minutes(&preference.time_range_end),
    ) else {
        return false;
    };
    start <= shift && shift <= end
}
