use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use medtrack_core::errors::MedError;
use medtrack_core::models::schedule::DayOfWeek;
use medtrack_core::time::{
    format_time_of_day, local_to_utc, parse_time_of_day, parse_zone, start_of_day_utc, zoned_date,
    zoned_time, zoned_weekday,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case("00:00", 0, 0)]
#[case("08:30", 8, 30)]
#[case("23:59", 23, 59)]
fn test_parse_time_of_day_accepts_valid(#[case] input: &str, #[case] hour: u32, #[case] minute: u32) {
    let parsed = parse_time_of_day(input).unwrap();
    assert_eq!(parsed, NaiveTime::from_hms_opt(hour, minute, 0).unwrap());
}

#[rstest]
#[case("24:00")]
#[case("12:60")]
#[case("8:00")]
#[case("08:0")]
#[case("0800")]
#[case("08:00:00")]
#[case("ab:cd")]
#[case("")]
fn test_parse_time_of_day_rejects_malformed(#[case] input: &str) {
    let err = parse_time_of_day(input).unwrap_err();
    assert!(matches!(err, MedError::Validation(_)));
}

#[test]
fn test_parse_zone_rejects_unknown_name() {
    assert!(parse_zone("America/New_York").is_ok());
    let err = parse_zone("Mars/Olympus_Mons").unwrap_err();
    assert!(matches!(err, MedError::Validation(_)));
}

#[test]
fn test_local_to_utc_standard_and_daylight_offsets() {
    // Eastern standard time is UTC-5, daylight time is UTC-4. The same
    // wall-clock time maps to different UTC instants across the
    // transition.
    let winter = local_to_utc(date(2021, 1, 15), NaiveTime::from_hms_opt(8, 0, 0).unwrap(), New_York);
    assert_eq!(winter, Utc.with_ymd_and_hms(2021, 1, 15, 13, 0, 0).unwrap());

    let summer = local_to_utc(date(2021, 7, 15), NaiveTime::from_hms_opt(8, 0, 0).unwrap(), New_York);
    assert_eq!(summer, Utc.with_ymd_and_hms(2021, 7, 15, 12, 0, 0).unwrap());
}

#[test]
fn test_local_to_utc_round_trips_across_spring_forward() {
    // 2021-03-14 is the US spring-forward date. 08:00 local exists and
    // must survive the round trip.
    let d = date(2021, 3, 14);
    let local = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let instant = local_to_utc(d, local, New_York);

    assert_eq!(zoned_date(instant, New_York), d);
    assert_eq!(zoned_time(instant, New_York), local);
    assert_eq!(format_time_of_day(zoned_time(instant, New_York)), "08:00");
}

#[test]
fn test_local_to_utc_rolls_gap_time_forward() {
    // 02:30 does not exist on the spring-forward date; it resolves to
    // the first valid instant, 03:00 EDT = 07:00 UTC.
    let instant = local_to_utc(
        date(2021, 3, 14),
        NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        New_York,
    );
    assert_eq!(instant, Utc.with_ymd_and_hms(2021, 3, 14, 7, 0, 0).unwrap());
}

#[test]
fn test_local_to_utc_resolves_ambiguous_time_to_earliest() {
    // 01:30 happens twice on the fall-back date; the earliest offset
    // (EDT, UTC-4) wins.
    let instant = local_to_utc(
        date(2021, 11, 7),
        NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
        New_York,
    );
    assert_eq!(instant, Utc.with_ymd_and_hms(2021, 11, 7, 5, 30, 0).unwrap());
}

#[test]
fn test_start_of_day_utc() {
    let instant = start_of_day_utc(date(2021, 1, 15), New_York);
    assert_eq!(instant, Utc.with_ymd_and_hms(2021, 1, 15, 5, 0, 0).unwrap());
}

#[test]
fn test_clocks() {
    use medtrack_core::time::{Clock, FixedClock, SystemClock};

    let pinned = Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(FixedClock(pinned).now(), pinned);
    // The system clock moves; all we can assert is that it is past the
    // pinned test instant.
    assert!(SystemClock.now() > pinned);
}

#[test]
fn test_zoned_weekday_respects_zone_day_boundary() {
    // 03:00 UTC on Saturday is still Friday evening in New York.
    let instant = Utc.with_ymd_and_hms(2021, 1, 16, 3, 0, 0).unwrap();
    assert_eq!(zoned_weekday(instant, New_York), DayOfWeek::Fri);
    assert_eq!(zoned_weekday(instant, chrono_tz::UTC), DayOfWeek::Sat);
}
