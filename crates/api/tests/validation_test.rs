use chrono::NaiveDate;
use medtrack_api::handlers::dose::parse_id_list;
use medtrack_api::handlers::schedule::validate_schedule_input;
use medtrack_core::errors::MedError;
use medtrack_core::models::schedule::{CreateDoseScheduleRequest, DayOfWeek};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn request() -> CreateDoseScheduleRequest {
    CreateDoseScheduleRequest {
        timezone: "America/New_York".to_string(),
        days_of_week: vec![DayOfWeek::Mon, DayOfWeek::Wed, DayOfWeek::Mon],
        times: vec!["08:00".to_string(), "20:00".to_string(), "08:00".to_string()],
        quantity: Some(1.0),
        unit: Some("tablet".to_string()),
        start_date: None,
        end_date: None,
    }
}

#[test]
fn test_schedule_input_is_deduplicated_and_sorted() {
    let normalized = validate_schedule_input(&request()).unwrap();
    assert_eq!(normalized.days_of_week, vec!["MON".to_string(), "WED".to_string()]);
    assert_eq!(normalized.times, vec!["08:00".to_string(), "20:00".to_string()]);
}

#[test]
fn test_schedule_input_rejects_unknown_timezone() {
    let mut req = request();
    req.timezone = "Nowhere/Special".to_string();
    assert!(matches!(
        validate_schedule_input(&req),
        Err(MedError::Validation(_))
    ));
}

#[test]
fn test_schedule_input_rejects_malformed_time() {
    let mut req = request();
    req.times = vec!["8am".to_string()];
    assert!(matches!(
        validate_schedule_input(&req),
        Err(MedError::Validation(_))
    ));
}

#[test]
fn test_schedule_input_rejects_inverted_window() {
    let mut req = request();
    req.start_date = NaiveDate::from_ymd_opt(2021, 6, 1);
    req.end_date = NaiveDate::from_ymd_opt(2021, 3, 1);
    assert!(matches!(
        validate_schedule_input(&req),
        Err(MedError::Validation(_))
    ));
}

#[test]
fn test_schedule_input_rejects_bad_quantity() {
    let mut req = request();
    req.quantity = Some(0.0);
    assert!(matches!(
        validate_schedule_input(&req),
        Err(MedError::Validation(_))
    ));
}

#[test]
fn test_schedule_input_allows_empty_sets() {
    // PRN-style schedules expand to nothing; entering one is not an
    // error.
    let mut req = request();
    req.days_of_week.clear();
    req.times.clear();
    let normalized = validate_schedule_input(&req).unwrap();
    assert!(normalized.days_of_week.is_empty());
    assert!(normalized.times.is_empty());
}

#[test]
fn test_parse_id_list() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let parsed = parse_id_list(&format!("{}, {} ,", a, b)).unwrap();
    assert_eq!(parsed, vec![a, b]);

    assert!(parse_id_list("abc").is_err());
    assert!(parse_id_list("").unwrap().is_empty());
}
