use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::error::DiaryError;
use crate::models::appointment::Appointment;
use crate::service::clock::Clock;
use crate::service::datetime::max_allowed_date;

/// One user's appointments, kept sorted by `(date, start)`.
///
/// Appointments are bucketed per date so conflict checks and lookups only
/// scan a single day. Within a bucket no two appointments conflict (see
/// [`Appointment::conflicts_with`]), so start times are unique.
pub struct UserDiary {
    days: BTreeMap<NaiveDate, Vec<Appointment>>,
    clock: Arc<dyn Clock>,
}

impl UserDiary {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            days: BTreeMap::new(),
            clock,
        }
    }

    pub fn schedule(
        &mut self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        purpose: &str,
    ) -> Result<(), DiaryError> {
        let today = self.clock.today();
        let max = max_allowed_date();
        if date < today || date > max {
            return Err(DiaryError::OutOfWindow { date, today, max });
        }
        if start >= end {
            return Err(DiaryError::InvalidInterval { start, end });
        }

        let conflict = self
            .days
            .get(&date)
            .is_some_and(|day| day.iter().any(|apt| apt.conflicts_with(start, end)));
        if conflict {
            return Err(DiaryError::Conflict { date, start, end });
        }

        let day = self.days.entry(date).or_default();
        let pos = day.partition_point(|apt| apt.start() < start);
        day.insert(pos, Appointment::new(date, start, end, purpose));
        debug!(%date, %start, %end, "appointment scheduled");
        Ok(())
    }

    /// Removes the appointment keyed by `(date, start)`. Returns whether one
    /// was removed.
    pub fn cancel(&mut self, date: NaiveDate, start: NaiveTime) -> bool {
        let Some(day) = self.days.get_mut(&date) else {
            return false;
        };
        let Some(pos) = day.iter().position(|apt| apt.start() == start) else {
            return false;
        };
        day.remove(pos);
        if day.is_empty() {
            self.days.remove(&date);
        }
        debug!(%date, %start, "appointment cancelled");
        true
    }

    /// Earliest appointment on `date` whose `[start, end)` contains `time`.
    pub fn find_at(&self, date: NaiveDate, time: NaiveTime) -> Option<&Appointment> {
        self.days
            .get(&date)?
            .iter()
            .find(|apt| apt.contains_time(time))
    }

    pub fn get_by_start(&self, date: NaiveDate, start: NaiveTime) -> Option<&Appointment> {
        self.days
            .get(&date)?
            .iter()
            .find(|apt| apt.start() == start)
    }

    /// Moves an appointment to a new slot, keeping its purpose.
    ///
    /// The old slot is vacated before the new one is validated, so an
    /// appointment may be shifted into a range overlapping its own previous
    /// position. On failure the original is put back through the same
    /// validated path as [`UserDiary::schedule`]; if that restore is itself
    /// rejected (today moved past the original date mid-call) the original
    /// is lost and only a warning is logged.
    pub fn reschedule(
        &mut self,
        old_date: NaiveDate,
        old_start: NaiveTime,
        new_date: NaiveDate,
        new_start: NaiveTime,
        new_end: NaiveTime,
    ) -> Result<(), DiaryError> {
        let original = self
            .get_by_start(old_date, old_start)
            .cloned()
            .ok_or(DiaryError::NotFound {
                date: old_date,
                start: old_start,
            })?;
        self.cancel(old_date, old_start);

        let moved = original.rescheduled(new_date, new_start, new_end);
        match self.schedule(moved.date(), moved.start(), moved.end(), moved.purpose()) {
            Ok(()) => {
                debug!(%old_date, %old_start, %new_date, %new_start, "appointment rescheduled");
                Ok(())
            }
            Err(err) => {
                if let Err(restore_err) = self.schedule(
                    original.date(),
                    original.start(),
                    original.end(),
                    original.purpose(),
                ) {
                    warn!(
                        error = %restore_err,
                        date = %original.date(),
                        start = %original.start(),
                        "could not restore appointment after failed reschedule"
                    );
                }
                Err(err)
            }
        }
    }

    /// Snapshot of every appointment in `(date, start)` order.
    pub fn list_all(&self) -> Vec<Appointment> {
        self.days.values().flatten().cloned().collect()
    }

    pub fn list_on(&self, date: NaiveDate) -> Vec<Appointment> {
        self.days.get(&date).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
