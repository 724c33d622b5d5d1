use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use medtrack_core::adherence::{
    adherence_rate, apply_edit, is_past_due, mark_missed_if_due, skip, summarize, take,
};
use medtrack_core::errors::MedError;
use medtrack_core::models::dose::{DoseLog, DoseStatus, UpdateDoseLogRequest};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn dose(status: DoseStatus, scheduled_for: DateTime<Utc>) -> DoseLog {
    DoseLog {
        id: Uuid::new_v4(),
        prescription_id: Uuid::new_v4(),
        schedule_id: Some(Uuid::new_v4()),
        scheduled_for,
        status,
        taken_at: None,
        quantity: Some(1.0),
        unit: Some("tablet".to_string()),
        created_at: scheduled_for,
    }
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn test_take_from_scheduled_sets_taken_at() {
    let mut d = dose(DoseStatus::Scheduled, utc(2021, 3, 1, 8, 0));
    let at = utc(2021, 3, 1, 8, 5);
    take(&mut d, at).unwrap();
    assert_eq!(d.status, DoseStatus::Taken);
    assert_eq!(d.taken_at, Some(at));
}

#[test]
fn test_late_take_corrects_missed() {
    let mut d = dose(DoseStatus::Missed, utc(2021, 3, 1, 8, 0));
    take(&mut d, utc(2021, 3, 1, 11, 0)).unwrap();
    assert_eq!(d.status, DoseStatus::Taken);
}

#[test]
fn test_take_rejected_from_taken_and_skipped() {
    let mut taken = dose(DoseStatus::Taken, utc(2021, 3, 1, 8, 0));
    assert!(matches!(take(&mut taken, utc(2021, 3, 1, 9, 0)), Err(MedError::Validation(_))));

    let mut skipped = dose(DoseStatus::Skipped, utc(2021, 3, 1, 8, 0));
    assert!(matches!(take(&mut skipped, utc(2021, 3, 1, 9, 0)), Err(MedError::Validation(_))));
}

#[test]
fn test_skip_clears_taken_at() {
    let mut d = dose(DoseStatus::Scheduled, utc(2021, 3, 1, 8, 0));
    skip(&mut d).unwrap();
    assert_eq!(d.status, DoseStatus::Skipped);
    assert_eq!(d.taken_at, None);
}

#[test]
fn test_is_past_due_strictly_before_now() {
    let scheduled = utc(2021, 3, 1, 8, 0);
    assert!(is_past_due(scheduled, New_York, utc(2021, 3, 1, 8, 1)));
    assert!(!is_past_due(scheduled, New_York, scheduled));
    assert!(!is_past_due(scheduled, New_York, utc(2021, 3, 1, 7, 59)));
}

#[test]
fn test_mark_missed_only_from_scheduled_and_idempotent() {
    let scheduled_for = utc(2021, 3, 1, 8, 0);
    let now = utc(2021, 3, 1, 8, 1);

    let mut d = dose(DoseStatus::Scheduled, scheduled_for);
    assert!(mark_missed_if_due(&mut d, New_York, now));
    assert_eq!(d.status, DoseStatus::Missed);

    // Re-running the sweep marks nothing new and never un-misses.
    assert!(!mark_missed_if_due(&mut d, New_York, now));
    assert_eq!(d.status, DoseStatus::Missed);

    // Taken doses are left alone no matter how old.
    let mut taken = dose(DoseStatus::Taken, scheduled_for);
    assert!(!mark_missed_if_due(&mut taken, New_York, now));
    assert_eq!(taken.status, DoseStatus::Taken);
}

#[test]
fn test_future_dose_is_not_missed() {
    let mut d = dose(DoseStatus::Scheduled, utc(2021, 3, 1, 9, 0));
    assert!(!mark_missed_if_due(&mut d, New_York, utc(2021, 3, 1, 8, 0)));
    assert_eq!(d.status, DoseStatus::Scheduled);
}

#[test]
fn test_apply_edit_updates_fields_and_validates_quantity() {
    let mut d = dose(DoseStatus::Scheduled, utc(2021, 3, 1, 8, 0));

    let bad = UpdateDoseLogRequest { quantity: Some(f64::NAN), ..Default::default() };
    assert!(matches!(apply_edit(&mut d, &bad), Err(MedError::Validation(_))));
    assert_eq!(d.quantity, Some(1.0));

    let edit = UpdateDoseLogRequest {
        status: Some(DoseStatus::Taken),
        taken_at: Some(utc(2021, 3, 1, 8, 10)),
        quantity: Some(2.0),
        unit: Some("capsule".to_string()),
        ..Default::default()
    };
    apply_edit(&mut d, &edit).unwrap();
    assert_eq!(d.status, DoseStatus::Taken);
    assert_eq!(d.taken_at, Some(utc(2021, 3, 1, 8, 10)));
    assert_eq!(d.quantity, Some(2.0));
    assert_eq!(d.unit, Some("capsule".to_string()));
}

#[test]
fn test_apply_edit_status_away_from_taken_clears_taken_at() {
    let mut d = dose(DoseStatus::Taken, utc(2021, 3, 1, 8, 0));
    d.taken_at = Some(utc(2021, 3, 1, 8, 2));

    let edit = UpdateDoseLogRequest { status: Some(DoseStatus::Scheduled), ..Default::default() };
    apply_edit(&mut d, &edit).unwrap();
    assert_eq!(d.status, DoseStatus::Scheduled);
    assert_eq!(d.taken_at, None);
}

#[test]
fn test_adherence_rate_excludes_pending() {
    assert_eq!(adherence_rate(0, 0, 0), None);
    assert_eq!(adherence_rate(3, 1, 1), Some(60.0));

    let doses = vec![
        dose(DoseStatus::Taken, utc(2021, 3, 1, 8, 0)),
        dose(DoseStatus::Taken, utc(2021, 3, 2, 8, 0)),
        dose(DoseStatus::Missed, utc(2021, 3, 3, 8, 0)),
        dose(DoseStatus::Skipped, utc(2021, 3, 4, 8, 0)),
        dose(DoseStatus::Scheduled, utc(2021, 3, 5, 8, 0)),
    ];
    let summary = summarize(&doses);
    assert_eq!(summary.taken, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.missed, 1);
    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.adherence_rate, Some(50.0));
}
