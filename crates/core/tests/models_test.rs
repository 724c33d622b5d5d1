use std::str::FromStr;

use chrono::NaiveDate;
use medtrack_core::models::dose::DoseStatus;
use medtrack_core::models::schedule::{DateWindow, DayOfWeek};
use medtrack_core::models::settings::{NotificationChannel, TimeFormat, UserSettings};
use pretty_assertions::assert_eq;
use serde_json::{from_str, json, to_value};
use uuid::Uuid;

#[test]
fn test_day_of_week_wire_format() {
    assert_eq!(to_value(DayOfWeek::Mon).unwrap(), json!("MON"));
    let parsed: DayOfWeek = from_str("\"FRI\"").unwrap();
    assert_eq!(parsed, DayOfWeek::Fri);

    // Database text round trip, case-insensitive on the way in.
    assert_eq!(DayOfWeek::from_str("sun").unwrap(), DayOfWeek::Sun);
    assert_eq!(DayOfWeek::Wed.to_string(), "WED");
    assert!(DayOfWeek::from_str("FUNDAY").is_err());
}

#[test]
fn test_dose_status_wire_format() {
    assert_eq!(to_value(DoseStatus::Scheduled).unwrap(), json!("SCHEDULED"));
    assert_eq!(DoseStatus::from_str("missed").unwrap(), DoseStatus::Missed);
    assert!(DoseStatus::from_str("PENDING").is_err());
}

#[test]
fn test_settings_wire_formats_and_defaults() {
    assert_eq!(to_value(TimeFormat::Hour12).unwrap(), json!("12h"));
    assert_eq!(to_value(NotificationChannel::Email).unwrap(), json!("email"));

    let defaults = UserSettings::defaults(Uuid::new_v4());
    assert_eq!(defaults.timezone, "UTC");
    assert_eq!(defaults.time_format, TimeFormat::Hour24);
    assert!(defaults.default_channels.contains(&NotificationChannel::Push));
}

#[test]
fn test_date_window_ordering_check() {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

    assert!(DateWindow::new(Some(d(2021, 3, 1)), Some(d(2021, 3, 31))).ensure_ordered().is_ok());
    assert!(DateWindow::new(Some(d(2021, 3, 31)), Some(d(2021, 3, 1))).ensure_ordered().is_err());
    // Open-ended windows are always ordered.
    assert!(DateWindow::new(None, Some(d(2021, 3, 1))).ensure_ordered().is_ok());
    assert!(DateWindow::new(Some(d(2021, 3, 1)), None).ensure_ordered().is_ok());
}

#[test]
fn test_date_window_intersection() {
    let d = |y: i32, m: u32, day: u32| NaiveDate::from_ymd_opt(y, m, day).unwrap();

    let bounded = DateWindow::new(Some(d(2021, 3, 1)), Some(d(2021, 3, 31)));
    let open = DateWindow::default();
    assert_eq!(bounded.intersect(&open), bounded);

    let late_start = DateWindow::new(Some(d(2021, 3, 15)), None);
    let clipped = bounded.intersect(&late_start);
    assert_eq!(clipped, DateWindow::new(Some(d(2021, 3, 15)), Some(d(2021, 3, 31))));

    assert!(clipped.contains(d(2021, 3, 20)));
    assert!(!clipped.contains(d(2021, 3, 14)));
    assert!(!clipped.contains(d(2021, 4, 1)));
}
