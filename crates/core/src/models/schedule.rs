use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MedError;

/// Day of the week as stored on a schedule. Ordered Mon..Sun so day sets
/// render in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOfWeek::Mon => "MON",
            DayOfWeek::Tue => "TUE",
            DayOfWeek::Wed => "WED",
            DayOfWeek::Thu => "THU",
            DayOfWeek::Fri => "FRI",
            DayOfWeek::Sat => "SAT",
            DayOfWeek::Sun => "SUN",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DayOfWeek {
    type Err = MedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MON" => Ok(DayOfWeek::Mon),
            "TUE" => Ok(DayOfWeek::Tue),
            "WED" => Ok(DayOfWeek::Wed),
            "THU" => Ok(DayOfWeek::Thu),
            "FRI" => Ok(DayOfWeek::Fri),
            "SAT" => Ok(DayOfWeek::Sat),
            "SUN" => Ok(DayOfWeek::Sun),
            other => Err(MedError::Validation(format!("Unknown weekday: {}", other))),
        }
    }
}

/// Validity window over local calendar dates. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Validation error when both bounds are set out of order.
    pub fn ensure_ordered(&self) -> Result<(), MedError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(MedError::Validation(format!(
                    "Date window is inverted: {} is after {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Two windows overlap unless one end provably precedes the other
    /// start. An unbounded window overlaps everything.
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        if let (Some(end), Some(start)) = (self.end, other.start) {
            if end < start {
                return false;
            }
        }
        if let (Some(end), Some(start)) = (other.end, self.start) {
            if end < start {
                return false;
            }
        }
        true
    }

    /// Intersection of two windows: the later start and the earlier end.
    pub fn intersect(&self, other: &DateWindow) -> DateWindow {
        let start = match (self.start, other.start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        DateWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// A recurring weekly dosing rule belonging to one prescription.
///
/// Days and times are sets: duplicates are meaningless and the stored
/// representation is deduplicated. `timezone` is the IANA zone in which
/// the days and times are interpreted when expanding occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseSchedule {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub timezone: String,
    pub days_of_week: BTreeSet<DayOfWeek>,
    pub times: BTreeSet<NaiveTime>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DoseSchedule {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoseScheduleRequest {
    pub timezone: String,
    pub days_of_week: Vec<DayOfWeek>,
    /// Times of day in 24-hour `HH:mm` form.
    pub times: Vec<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoseScheduleRequest {
    pub timezone: Option<String>,
    pub days_of_week: Option<Vec<DayOfWeek>>,
    pub times: Option<Vec<String>>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One conflicting schedule, with the shared days and times so the
/// caller can explain the conflict rather than just flag it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub schedule_id: Uuid,
    pub prescription_id: Uuid,
    pub days: Vec<DayOfWeek>,
    pub times: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseScheduleResponse {
    pub schedule: DoseSchedule,
    pub conflicts: Vec<ScheduleConflict>,
}

/// Quantity/unit rollout to upcoming scheduled doses after a schedule
/// edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyToUpcomingRequest {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}
