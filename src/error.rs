use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time `{0}`, expected H:MM AM/PM")]
    InvalidTime(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiaryError {
    #[error("{date} is outside the schedulable window {today}..={max}")]
    OutOfWindow {
        date: NaiveDate,
        today: NaiveDate,
        max: NaiveDate,
    },

    #[error("start {start} is not before end {end}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    #[error("slot {start}-{end} on {date} overlaps an existing appointment")]
    Conflict {
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("no appointment on {date} starting at {start}")]
    NotFound { date: NaiveDate, start: NaiveTime },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("username must not be blank")]
    InvalidUsername,

    #[error("user `{0}` already exists")]
    DuplicateUser(String),

    #[error("user `{0}` not found")]
    UserNotFound(String),
}
