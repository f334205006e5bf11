//! Property-based tests for slot generation using proptest.
//!
//! These tests verify invariants that should hold for *any* working window
//! and duration, not just the specific examples in `slots_tests.rs`.

use booking_engine::calendar::is_date_bookable;
use booking_engine::config::SchedulingConfig;
use booking_engine::slots::{generate_slots_for_day, generate_slots_with_interval};
use booking_engine::WallTime;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any time of day on a 5-minute grid, `00:00..=24:00`.
fn arb_wall_time() -> impl Strategy<Value = WallTime> {
    (0u32..=288).prop_map(|n| WallTime::from_minutes(n * 5).unwrap())
}

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(15u32),
        Just(30),
        Just(45),
        Just(60),
        Just(90),
        Just(120),
        Just(180),
        Just(u32::MAX),
        1u32..=600,
    ]
}

fn arb_interval() -> impl Strategy<Value = u32> {
    prop_oneof![1u32..=120, Just(u32::MAX)]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Every slot lies inside the working window and has exact length
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_fit_window_with_exact_duration(
        start in arb_wall_time(),
        end in arb_wall_time(),
        dur in arb_duration(),
    ) {
        for slot in generate_slots_for_day(start, end, dur) {
            prop_assert!(slot.time >= start, "{} starts before {}", slot.display, start);
            prop_assert!(slot.end_time <= end, "{} ends after {}", slot.display, end);
            prop_assert_eq!(slot.end_time.minutes() - slot.time.minutes(), dur);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Strictly ascending starts, all on the grid anchored at opening
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn starts_strictly_ascending_on_grid(
        start in arb_wall_time(),
        end in arb_wall_time(),
        dur in arb_duration(),
        step in arb_interval(),
    ) {
        let slots = generate_slots_with_interval(start, end, dur, step);
        for window in slots.windows(2) {
            prop_assert_eq!(window[1].time.minutes() - window[0].time.minutes(), step);
        }
        for slot in &slots {
            prop_assert_eq!((slot.time.minutes() - start.minutes()) % step, 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Grid is maximal — the next grid step would overrun closing time
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn grid_is_maximal(
        start in arb_wall_time(),
        end in arb_wall_time(),
        dur in arb_duration(),
    ) {
        let slots = generate_slots_for_day(start, end, dur);
        let next_start = match slots.last() {
            Some(last) => u64::from(last.time.minutes()) + 30,
            None => u64::from(start.minutes()),
        };
        if start < end {
            prop_assert!(next_start + u64::from(dur) > u64::from(end.minutes()));
        } else {
            prop_assert!(slots.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Generation is a pure function
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn generation_is_idempotent(
        start in arb_wall_time(),
        end in arb_wall_time(),
        dur in arb_duration(),
    ) {
        prop_assert_eq!(
            generate_slots_for_day(start, end, dur),
            generate_slots_for_day(start, end, dur)
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: Booking window bounds
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn nothing_outside_window_is_bookable(
        today in arb_date(),
        offset in -400i64..400,
        days in 0u32..120,
    ) {
        let config = SchedulingConfig { advance_booking_days: days, ..SchedulingConfig::default() };
        let target = today + Duration::days(offset);
        if is_date_bookable(target, today, &config) {
            prop_assert!(offset >= 0);
            prop_assert!(offset <= i64::from(days));
            prop_assert!(config.working_hours.is_open(target));
        }
    }
}
