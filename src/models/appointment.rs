use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveTime};

use crate::service::datetime::{format_date, format_time};

/// A single booked slot in a user's diary.
///
/// Equality, hashing and ordering only look at `(date, start)`: two
/// appointments starting at the same instant are the same slot regardless of
/// their end time or purpose. Values are immutable; moving an appointment
/// produces a new value through [`Appointment::rescheduled`].
#[derive(Debug, Clone)]
pub struct Appointment {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    purpose: String,
}

impl Appointment {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime, purpose: &str) -> Self {
        Self {
            date,
            start,
            end,
            purpose: purpose.to_string(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Same purpose, new slot.
    pub fn rescheduled(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date,
            start,
            end,
            purpose: self.purpose.clone(),
        }
    }

    /// True when `[other_start, other_end]` shares any instant with this
    /// appointment, shared endpoints included.
    pub fn conflicts_with(&self, other_start: NaiveTime, other_end: NaiveTime) -> bool {
        !(self.end < other_start || self.start > other_end)
    }

    /// Half-open containment: `start <= time < end`.
    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    pub(crate) fn key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start)
    }
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Appointment {}

impl Hash for Appointment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Appointment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Appointment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} to {} - {}",
            format_date(self.date),
            format_time(self.start),
            format_time(self.end),
            self.purpose
        )
    }
}
