//! Tests for recurring booking expansion and planning.

use booking_engine::booking::{BookingRequest, BookingStatus};
use booking_engine::config::SchedulingConfig;
use booking_engine::error::EngineError;
use booking_engine::recurring::{expand_recurrence, plan_recurring_bookings, RecurrenceFrequency};
use booking_engine::WallTime;
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(s: &str) -> WallTime {
    s.parse().unwrap()
}

fn request() -> BookingRequest {
    BookingRequest {
        event_type_id: "meeting-60".to_string(),
        date: date(2026, 3, 16),
        time: t("10:00"),
        end_time: t("11:00"),
        guest_name: "Customer A".to_string(),
        guest_email: "customer_a@example.com".to_string(),
        guest_phone: "081-234-5678".to_string(),
        notes: String::new(),
    }
}

// ---------------------------------------------------------------------------
// expand_recurrence
// ---------------------------------------------------------------------------

#[test]
fn weekly_recurrence_steps_seven_days() {
    let result = expand_recurrence(
        date(2026, 3, 16),
        t("10:00"),
        60,
        RecurrenceFrequency::Weekly,
        4,
        "Asia/Bangkok",
    )
    .expect("should expand successfully");

    let dates: Vec<NaiveDate> = result.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2026, 3, 16),
            date(2026, 3, 23),
            date(2026, 3, 30),
            date(2026, 4, 6)
        ]
    );
    // 10:00 in Bangkok (UTC+7) is 03:00 UTC.
    assert_eq!(
        result[0].start,
        Utc.with_ymd_and_hms(2026, 3, 16, 3, 0, 0).unwrap()
    );
    assert!(result.iter().all(|o| o.end - o.start == Duration::minutes(60)));
    assert!(result.iter().all(|o| o.time == t("10:00") && o.end_time == t("11:00")));
}

#[test]
fn biweekly_recurrence_steps_fourteen_days() {
    let result = expand_recurrence(
        date(2026, 3, 16),
        t("09:00"),
        30,
        RecurrenceFrequency::Biweekly,
        3,
        "Asia/Bangkok",
    )
    .unwrap();

    let dates: Vec<NaiveDate> = result.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![date(2026, 3, 16), date(2026, 3, 30), date(2026, 4, 13)]
    );
}

#[test]
fn monthly_recurrence_steps_thirty_days() {
    let result = expand_recurrence(
        date(2026, 1, 31),
        t("09:00"),
        30,
        RecurrenceFrequency::Monthly,
        3,
        "UTC",
    )
    .unwrap();

    let dates: Vec<NaiveDate> = result.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![date(2026, 1, 31), date(2026, 3, 2), date(2026, 4, 1)]
    );
}

#[test]
fn local_time_is_kept_across_dst_change() {
    // US spring-forward is 2026-03-08: 09:00 EST = 14:00 UTC, 09:00 EDT = 13:00 UTC.
    let result = expand_recurrence(
        date(2026, 3, 2),
        t("09:00"),
        60,
        RecurrenceFrequency::Weekly,
        2,
        "America/New_York",
    )
    .unwrap();

    assert_eq!(
        result[0].start,
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
    );
    assert_eq!(
        result[1].start,
        Utc.with_ymd_and_hms(2026, 3, 9, 13, 0, 0).unwrap()
    );
    assert_eq!(result[1].time, t("09:00"));
}

#[test]
fn zero_occurrences_is_empty() {
    let result = expand_recurrence(
        date(2026, 3, 16),
        t("10:00"),
        60,
        RecurrenceFrequency::Weekly,
        0,
        "Asia/Bangkok",
    )
    .unwrap();
    assert!(result.is_empty());
}

#[test]
fn invalid_timezone_is_rejected() {
    let result = expand_recurrence(
        date(2026, 3, 16),
        t("10:00"),
        60,
        RecurrenceFrequency::Weekly,
        2,
        "Mars/Olympus_Mons",
    );
    assert!(matches!(result, Err(EngineError::InvalidTimezone(_))));
}

#[test]
fn frequency_parses_case_insensitively() {
    assert_eq!(
        "Weekly".parse::<RecurrenceFrequency>().unwrap(),
        RecurrenceFrequency::Weekly
    );
    assert_eq!(
        "BIWEEKLY".parse::<RecurrenceFrequency>().unwrap(),
        RecurrenceFrequency::Biweekly
    );
    assert!("daily".parse::<RecurrenceFrequency>().is_err());
}

#[test]
fn occurrence_ending_at_midnight_keeps_its_day() {
    let series = expand_recurrence(
        date(2026, 3, 16),
        t("23:00"),
        60,
        RecurrenceFrequency::Weekly,
        2,
        "Asia/Bangkok",
    )
    .unwrap();

    assert_eq!(series.len(), 2);
    for occ in &series {
        assert_eq!(occ.time, t("23:00"));
        assert_eq!(occ.end_time, WallTime::END_OF_DAY);
        assert_eq!(occ.end - occ.start, Duration::minutes(60));
    }
    assert_eq!(series[1].date, date(2026, 3, 23));
}

// ---------------------------------------------------------------------------
// plan_recurring_bookings
// ---------------------------------------------------------------------------

#[test]
fn plan_shares_one_group_id() {
    let config = SchedulingConfig::default();
    let plan =
        plan_recurring_bookings(&request(), RecurrenceFrequency::Weekly, 4, &config).unwrap();

    assert_eq!(plan.bookings.len(), 4);
    assert!(plan.recurring_group_id.starts_with("RG-"));
    for booking in &plan.bookings {
        assert_eq!(
            booking.recurring_group_id.as_deref(),
            Some(plan.recurring_group_id.as_str())
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.time, t("10:00"));
        assert_eq!(booking.end_time, t("11:00"));
        assert_eq!(booking.guest_email, "customer_a@example.com");
    }

    let mut ids: Vec<&str> = plan.bookings.iter().map(|b| b.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4, "booking ids must be unique");
}

#[test]
fn plan_rejects_more_than_max_occurrences() {
    let config = SchedulingConfig::default();
    let result = plan_recurring_bookings(&request(), RecurrenceFrequency::Weekly, 13, &config);
    assert!(matches!(
        result,
        Err(EngineError::TooManyOccurrences {
            requested: 13,
            max: 12
        })
    ));
}

#[test]
fn plan_validates_the_request() {
    let config = SchedulingConfig::default();
    let bad = BookingRequest {
        guest_email: String::new(),
        ..request()
    };
    let result = plan_recurring_bookings(&bad, RecurrenceFrequency::Weekly, 2, &config);
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[test]
fn plan_for_last_slot_of_day_keeps_valid_bounds() {
    let config = SchedulingConfig::default();
    let late = BookingRequest {
        time: t("23:00"),
        end_time: t("24:00"),
        ..request()
    };
    let plan = plan_recurring_bookings(&late, RecurrenceFrequency::Biweekly, 3, &config).unwrap();

    assert_eq!(plan.bookings.len(), 3);
    for booking in &plan.bookings {
        assert!(booking.time < booking.end_time);
        assert_eq!(booking.end_time.to_string(), "24:00");
    }
}
