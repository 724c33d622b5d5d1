use chrono::{NaiveDate, NaiveTime};
use medtrack_core::conflict::check_conflicts;
use medtrack_core::models::schedule::{DayOfWeek, DoseSchedule};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn schedule(
    days: &[DayOfWeek],
    times: &[(u32, u32)],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> DoseSchedule {
    DoseSchedule {
        id: Uuid::new_v4(),
        prescription_id: Uuid::new_v4(),
        timezone: "UTC".to_string(),
        days_of_week: days.iter().copied().collect(),
        times: times
            .iter()
            .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
            .collect(),
        quantity: None,
        unit: None,
        start_date,
        end_date,
    }
}

#[test]
fn test_conflict_requires_all_three_dimensions() {
    let candidate = schedule(&[DayOfWeek::Mon, DayOfWeek::Wed], &[(8, 0)], None, None);

    // Same time, different days: no conflict.
    let other_days = schedule(&[DayOfWeek::Tue], &[(8, 0)], None, None);
    assert!(check_conflicts(&candidate, std::slice::from_ref(&other_days)).is_empty());

    // Same days, different time: no conflict.
    let other_times = schedule(&[DayOfWeek::Mon], &[(9, 0)], None, None);
    assert!(check_conflicts(&candidate, std::slice::from_ref(&other_times)).is_empty());

    // Shared day and time, overlapping (unbounded) windows: conflict.
    let clash = schedule(&[DayOfWeek::Mon], &[(8, 0)], None, None);
    let conflicts = check_conflicts(&candidate, std::slice::from_ref(&clash));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].schedule_id, clash.id);
    assert_eq!(conflicts[0].days, vec![DayOfWeek::Mon]);
    assert_eq!(conflicts[0].times, vec![NaiveTime::from_hms_opt(8, 0, 0).unwrap()]);
}

#[test]
fn test_unbounded_window_overlaps_future_bounded_window() {
    // Regression for the overlap policy: an unbounded window overlaps
    // any window, even one starting a year out.
    let unbounded = schedule(&[DayOfWeek::Mon], &[(8, 0)], None, None);
    let future = schedule(
        &[DayOfWeek::Mon],
        &[(8, 0)],
        Some(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()),
        None,
    );
    let conflicts = check_conflicts(&unbounded, std::slice::from_ref(&future));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].schedule_id, future.id);
}

#[test]
fn test_provably_disjoint_windows_do_not_conflict() {
    let past = schedule(
        &[DayOfWeek::Mon],
        &[(8, 0)],
        None,
        Some(NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()),
    );
    let future = schedule(
        &[DayOfWeek::Mon],
        &[(8, 0)],
        Some(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
        None,
    );
    assert!(check_conflicts(&past, std::slice::from_ref(&future)).is_empty());
    // Symmetric.
    assert!(check_conflicts(&future, std::slice::from_ref(&past)).is_empty());
}

#[test]
fn test_touching_windows_overlap() {
    // One ends the day the other starts: not provably disjoint.
    let first = schedule(
        &[DayOfWeek::Mon],
        &[(8, 0)],
        None,
        Some(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
    );
    let second = schedule(
        &[DayOfWeek::Mon],
        &[(8, 0)],
        Some(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
        None,
    );
    assert_eq!(check_conflicts(&first, std::slice::from_ref(&second)).len(), 1);
}

#[test]
fn test_candidate_excludes_itself_by_id() {
    let candidate = schedule(&[DayOfWeek::Mon], &[(8, 0)], None, None);
    let existing = vec![candidate.clone()];
    assert!(check_conflicts(&candidate, &existing).is_empty());
}

#[test]
fn test_reports_every_conflicting_schedule_with_intersections() {
    let candidate = schedule(
        &[DayOfWeek::Mon, DayOfWeek::Wed, DayOfWeek::Fri],
        &[(8, 0), (20, 0)],
        None,
        None,
    );
    let morning_overlap = schedule(&[DayOfWeek::Mon, DayOfWeek::Tue], &[(8, 0)], None, None);
    let evening_overlap = schedule(&[DayOfWeek::Fri, DayOfWeek::Sat], &[(20, 0), (22, 0)], None, None);
    let unrelated = schedule(&[DayOfWeek::Sun], &[(8, 0)], None, None);

    let existing = vec![morning_overlap.clone(), evening_overlap.clone(), unrelated];
    let conflicts = check_conflicts(&candidate, &existing);
    assert_eq!(conflicts.len(), 2);

    assert_eq!(conflicts[0].schedule_id, morning_overlap.id);
    assert_eq!(conflicts[0].days, vec![DayOfWeek::Mon]);
    assert_eq!(conflicts[0].times, vec![NaiveTime::from_hms_opt(8, 0, 0).unwrap()]);

    assert_eq!(conflicts[1].schedule_id, evening_overlap.id);
    assert_eq!(conflicts[1].days, vec![DayOfWeek::Fri]);
    assert_eq!(conflicts[1].times, vec![NaiveTime::from_hms_opt(20, 0, 0).unwrap()]);
}
