//! Pairwise schedule conflict detection.
//!
//! Two schedules conflict when all three dimensions collide: shared
//! weekday, shared time-of-day, and overlapping validity windows. The
//! check is symmetric and pairwise; conflicts are reported, never
//! resolved or merged.

use std::collections::BTreeSet;

use crate::models::schedule::{DoseSchedule, ScheduleConflict};

/// Compare a candidate against a user's other schedules and report every
/// conflicting one with the shared days and times. The candidate
/// excludes itself by id, so the same function serves create and update.
pub fn check_conflicts(
    candidate: &DoseSchedule,
    existing: &[DoseSchedule],
) -> Vec<ScheduleConflict> {
    existing
        .iter()
        .filter(|other| other.id != candidate.id)
        .filter_map(|other| conflict_between(candidate, other))
        .collect()
}

fn conflict_between(candidate: &DoseSchedule, other: &DoseSchedule) -> Option<ScheduleConflict> {
    let days: BTreeSet<_> = candidate
        .days_of_week
        .intersection(&other.days_of_week)
        .copied()
        .collect();
    if days.is_empty() {
        return None;
    }

    let times: BTreeSet<_> = candidate
        .times
        .intersection(&other.times)
        .copied()
        .collect();
    if times.is_empty() {
        return None;
    }

    if !candidate.window().overlaps(&other.window()) {
        return None;
    }

    Some(ScheduleConflict {
        schedule_id: other.id,
        prescription_id: other.prescription_id,
        days: days.into_iter().collect(),
        times: times.into_iter().collect(),
    })
}
