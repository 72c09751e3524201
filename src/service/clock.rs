use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of "today" for validity-window checks. Evaluated on every call so
/// a long-running session follows the calendar.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, optionally viewed through an IANA timezone instead of the host's
/// local zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    tz: Option<Tz>,
}

impl SystemClock {
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self, String> {
        let tz = name
            .trim()
            .parse::<Tz>()
            .map_err(|e| format!("Unknown timezone {}: {}", name, e))?;
        Ok(Self { tz: Some(tz) })
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
