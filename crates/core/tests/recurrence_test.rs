use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use medtrack_core::models::schedule::{DateWindow, DayOfWeek, DoseSchedule};
use medtrack_core::recurrence::{expand_occurrences, expand_within};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn schedule(
    timezone: &str,
    days: &[DayOfWeek],
    times: &[(u32, u32)],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> DoseSchedule {
    DoseSchedule {
        id: Uuid::new_v4(),
        prescription_id: Uuid::new_v4(),
        timezone: timezone.to_string(),
        days_of_week: days.iter().copied().collect(),
        times: times
            .iter()
            .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
            .collect::<BTreeSet<_>>(),
        quantity: Some(1.0),
        unit: Some("tablet".to_string()),
        start_date,
        end_date,
    }
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn test_mon_wed_fri_twice_daily_over_one_week() {
    // 2021-03-01 is a Monday. Seven days from a Monday hit Mon, Wed and
    // Fri once each, at both times: exactly six instants.
    let s = schedule("UTC", &[DayOfWeek::Mon, DayOfWeek::Wed, DayOfWeek::Fri], &[(8, 0), (20, 0)], None, None);
    let occurrences = expand_occurrences(&s, utc(2021, 3, 1, 0, 0), utc(2021, 3, 7, 23, 59)).unwrap();

    assert_eq!(
        occurrences,
        vec![
            utc(2021, 3, 1, 8, 0),
            utc(2021, 3, 1, 20, 0),
            utc(2021, 3, 3, 8, 0),
            utc(2021, 3, 3, 20, 0),
            utc(2021, 3, 5, 8, 0),
            utc(2021, 3, 5, 20, 0),
        ]
    );
}

#[test]
fn test_empty_day_or_time_set_expands_to_nothing() {
    let no_days = schedule("UTC", &[], &[(8, 0)], None, None);
    assert!(expand_occurrences(&no_days, utc(2021, 3, 1, 0, 0), utc(2021, 3, 31, 0, 0))
        .unwrap()
        .is_empty());

    let no_times = schedule("UTC", &[DayOfWeek::Mon], &[], None, None);
    assert!(expand_occurrences(&no_times, utc(2021, 3, 1, 0, 0), utc(2021, 3, 31, 0, 0))
        .unwrap()
        .is_empty());
}

#[test]
fn test_schedule_window_truncates_range() {
    let s = schedule(
        "UTC",
        &[DayOfWeek::Mon],
        &[(8, 0)],
        Some(NaiveDate::from_ymd_opt(2021, 3, 8).unwrap()),
        Some(NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()),
    );
    // Query covers four Mondays; the window keeps only the middle two.
    let occurrences = expand_occurrences(&s, utc(2021, 3, 1, 0, 0), utc(2021, 3, 28, 23, 59)).unwrap();
    assert_eq!(occurrences, vec![utc(2021, 3, 8, 8, 0), utc(2021, 3, 15, 8, 0)]);
}

#[test]
fn test_prescription_window_truncates_further() {
    let s = schedule("UTC", &[DayOfWeek::Mon], &[(8, 0)], None, None);
    let effective = s.window().intersect(&DateWindow::new(
        None,
        Some(NaiveDate::from_ymd_opt(2021, 3, 8).unwrap()),
    ));
    let occurrences =
        expand_within(&s, &effective, utc(2021, 3, 1, 0, 0), utc(2021, 3, 28, 23, 59)).unwrap();
    assert_eq!(occurrences, vec![utc(2021, 3, 1, 8, 0), utc(2021, 3, 8, 8, 0)]);
}

#[test]
fn test_query_bounds_clip_same_day_instants() {
    let s = schedule("UTC", &[DayOfWeek::Mon], &[(8, 0), (20, 0)], None, None);
    // Range opens after 08:00 on the first Monday and closes before
    // 20:00 on the second.
    let occurrences = expand_occurrences(&s, utc(2021, 3, 1, 9, 0), utc(2021, 3, 8, 19, 0)).unwrap();
    assert_eq!(occurrences, vec![utc(2021, 3, 1, 20, 0), utc(2021, 3, 8, 8, 0)]);
}

#[test]
fn test_local_times_shift_utc_across_dst() {
    // 08:00 New York is 13:00 UTC under standard time and 12:00 UTC
    // after spring-forward (2021-03-14).
    let s = schedule("America/New_York", &[DayOfWeek::Fri], &[(8, 0)], None, None);
    let occurrences = expand_occurrences(&s, utc(2021, 3, 12, 0, 0), utc(2021, 3, 19, 23, 59)).unwrap();
    assert_eq!(occurrences, vec![utc(2021, 3, 12, 13, 0), utc(2021, 3, 19, 12, 0)]);
}

#[test]
fn test_unknown_timezone_is_a_validation_error() {
    let s = schedule("Not/AZone", &[DayOfWeek::Mon], &[(8, 0)], None, None);
    assert!(expand_occurrences(&s, utc(2021, 3, 1, 0, 0), utc(2021, 3, 7, 0, 0)).is_err());
}

#[test]
fn test_inverted_range_expands_to_nothing() {
    let s = schedule("UTC", &[DayOfWeek::Mon], &[(8, 0)], None, None);
    assert!(expand_occurrences(&s, utc(2021, 3, 8, 0, 0), utc(2021, 3, 1, 0, 0))
        .unwrap()
        .is_empty());
}
