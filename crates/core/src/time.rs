//! Timezone-aware clock utilities.
//!
//! All scheduling math goes through this module so the rest of the crate
//! never touches raw offsets. The rules here:
//!
//! - a schedule's IANA zone decides how its local days and times map to
//!   UTC instants;
//! - ambiguous local times (fall-back) resolve to the earliest offset;
//! - nonexistent local times (spring-forward gap) roll forward to the
//!   first valid instant of that day.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{MedError, MedResult};
use crate::models::schedule::DayOfWeek;

/// Source of "now", injectable so batch jobs and tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for tests and replayable job runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn parse_zone(name: &str) -> MedResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| MedError::Validation(format!("Unknown timezone: {}", name)))
}

/// Strict `HH:mm` parser: exactly two zero-padded fields, hour 0-23,
/// minute 0-59.
pub fn parse_time_of_day(value: &str) -> MedResult<NaiveTime> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit();

    if !well_formed {
        return Err(MedError::Validation(format!(
            "Time must be in 24-hour HH:mm form, got: {}",
            value
        )));
    }

    let hour: u32 = value[0..2].parse().unwrap_or(u32::MAX);
    let minute: u32 = value[3..5].parse().unwrap_or(u32::MAX);

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        MedError::Validation(format!("Time out of range (00:00-23:59): {}", value))
    })
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Resolve a local calendar date + time-of-day in a zone to a UTC
/// instant, applying the DST policy above.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _latest) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Spring-forward gap. Step forward in 15-minute increments
            // until the local time exists again; every real transition
            // (including whole-day skips) terminates well inside the
            // bound.
            let mut probe = naive;
            for _ in 0..(24 * 4) {
                probe += Duration::minutes(15);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            // Unreachable for IANA data; interpret as UTC rather than panic.
            Utc.from_utc_datetime(&naive)
        }
    }
}

/// Wall-clock calendar date of a UTC instant in a zone.
pub fn zoned_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Wall-clock time-of-day of a UTC instant in a zone.
pub fn zoned_time(instant: DateTime<Utc>, tz: Tz) -> NaiveTime {
    instant.with_timezone(&tz).time()
}

/// Weekday of a UTC instant, evaluated in a zone.
pub fn zoned_weekday(instant: DateTime<Utc>, tz: Tz) -> DayOfWeek {
    DayOfWeek::from(instant.with_timezone(&tz).date_naive().weekday())
}

/// First valid instant of a local calendar date, as UTC. Zones whose DST
/// gap swallows midnight roll forward like any other gap.
pub fn start_of_day_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date, NaiveTime::MIN, tz)
}
