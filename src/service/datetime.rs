use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::ParseError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%-I:%M %p";

static DATE_RE: OnceLock<Regex> = OnceLock::new();
static TIME_RE: OnceLock<Regex> = OnceLock::new();

fn date_re() -> &'static Regex {
    DATE_RE.get_or_init(|| {
        Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date pattern compiles")
    })
}

fn time_re() -> &'static Regex {
    TIME_RE.get_or_init(|| {
        Regex::new(r"^(1[0-2]|0?[1-9]):([0-5][0-9]) (AM|PM)$").expect("time pattern compiles")
    })
}

/// Parses a strict `YYYY-MM-DD` date. Impossible calendar dates such as
/// `2026-02-30` are rejected rather than clamped.
pub fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = text.trim();
    let invalid = || ParseError::InvalidDate(trimmed.to_string());
    let caps = date_re().captures(trimmed).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parses `H:MM AM/PM` with a case-insensitive meridiem, e.g. `2:30 pm`.
pub fn parse_time(text: &str) -> Result<NaiveTime, ParseError> {
    let normalized = text.trim().to_uppercase();
    let invalid = || ParseError::InvalidTime(text.trim().to_string());
    let caps = time_re().captures(&normalized).ok_or_else(invalid)?;
    let hour12: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
    let hour = match &caps[3] {
        "PM" => hour12 % 12 + 12,
        _ => hour12 % 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Both ends present and `start` strictly before `end`.
pub fn is_valid_interval(start: Option<NaiveTime>, end: Option<NaiveTime>) -> bool {
    matches!((start, end), (Some(start), Some(end)) if start < end)
}

/// Last date on which anything may be scheduled.
pub fn max_allowed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).expect("2026-12-31 is a valid date")
}
