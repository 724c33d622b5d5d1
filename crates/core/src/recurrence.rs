//! Weekly recurrence expansion.
//!
//! Walks local calendar days in the schedule's own timezone and resolves
//! each matching (day, time) pair to a UTC instant. Day boundaries and
//! DST transitions therefore follow the zone, not the server clock.

use chrono::{DateTime, Datelike, Utc};

use crate::errors::MedResult;
use crate::models::schedule::{DateWindow, DayOfWeek, DoseSchedule};
use crate::time;

/// Expand a schedule into the UTC instants at which a dose should exist
/// within `[from, to]`, truncated by the schedule's own validity window.
pub fn expand_occurrences(
    schedule: &DoseSchedule,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> MedResult<Vec<DateTime<Utc>>> {
    expand_within(schedule, &schedule.window(), from, to)
}

/// Expand against an explicit validity window. The materializer passes
/// the intersection of the schedule and prescription windows here so a
/// prescription end date truncates every schedule under it.
pub fn expand_within(
    schedule: &DoseSchedule,
    window: &DateWindow,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> MedResult<Vec<DateTime<Utc>>> {
    // PRN-style schedules with no days or no times expand to nothing.
    if schedule.days_of_week.is_empty() || schedule.times.is_empty() || from > to {
        return Ok(Vec::new());
    }

    let tz = time::parse_zone(&schedule.timezone)?;

    let mut day = {
        let from_local = time::zoned_date(from, tz);
        match window.start {
            Some(start) if start > from_local => start,
            _ => from_local,
        }
    };
    let last_day = {
        let to_local = time::zoned_date(to, tz);
        match window.end {
            Some(end) if end < to_local => end,
            _ => to_local,
        }
    };

    let mut occurrences = Vec::new();
    while day <= last_day {
        if schedule.days_of_week.contains(&DayOfWeek::from(day.weekday())) {
            for &tod in &schedule.times {
                let instant = time::local_to_utc(day, tod, tz);
                if instant >= from && instant <= to {
                    occurrences.push(instant);
                }
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    // Days are walked in order and times are a sorted set, but a DST
    // transition can reorder or collide adjacent instants.
    occurrences.sort();
    occurrences.dedup();
    Ok(occurrences)
}
