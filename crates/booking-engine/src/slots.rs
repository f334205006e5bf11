//! Candidate time slots for a single day.
//!
//! Slots start on a fixed grid (every 30 minutes by default) from opening
//! time. A slot is offered only if it ends at or before closing time; the last
//! slot is never shortened to fit. Consecutive slots overlap whenever the
//! duration exceeds the grid step: every slot is a candidate start time, not a
//! reserved block.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::WallTime;
use crate::config::{SchedulingConfig, DEFAULT_SLOT_INTERVAL_MINUTES};
use crate::event_type::{EventType, FixedTime};

/// A bookable window `[time, end_time)` on some day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: WallTime,
    pub end_time: WallTime,
    /// `"HH:MM - HH:MM"`.
    pub display: String,
}

impl TimeSlot {
    pub fn new(time: WallTime, end_time: WallTime) -> Self {
        Self {
            time,
            end_time,
            display: format!("{} - {}", time, end_time),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes().saturating_sub(self.time.minutes())
    }
}

impl From<FixedTime> for TimeSlot {
    fn from(fixed: FixedTime) -> Self {
        TimeSlot::new(fixed.start, fixed.end)
    }
}

/// The offering for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySlots {
    /// No working hours on this weekday.
    Closed,
    /// A fixed-time event type's single window.
    Fixed(TimeSlot),
    /// Grid-generated candidates (possibly empty if nothing fits).
    Generated(Vec<TimeSlot>),
}

impl DaySlots {
    pub fn into_slots(self) -> Vec<TimeSlot> {
        match self {
            DaySlots::Closed => Vec::new(),
            DaySlots::Fixed(slot) => vec![slot],
            DaySlots::Generated(slots) => slots,
        }
    }
}

/// Generate candidate slots on the standard 30-minute grid.
///
/// Returns an empty list when `start >= end` or `duration_minutes == 0`.
pub fn generate_slots_for_day(
    start: WallTime,
    end: WallTime,
    duration_minutes: u32,
) -> Vec<TimeSlot> {
    generate_slots_with_interval(start, end, duration_minutes, DEFAULT_SLOT_INTERVAL_MINUTES)
}

/// Generate candidate slots with a custom grid step.
///
/// An `interval_minutes` of 0 falls back to the standard 30-minute step.
pub fn generate_slots_with_interval(
    start: WallTime,
    end: WallTime,
    duration_minutes: u32,
    interval_minutes: u32,
) -> Vec<TimeSlot> {
    if start >= end || duration_minutes == 0 {
        return Vec::new();
    }
    let step = if interval_minutes == 0 {
        DEFAULT_SLOT_INTERVAL_MINUTES
    } else {
        interval_minutes
    };

    let mut slots = Vec::new();
    let mut cursor = start.minutes();
    let close = end.minutes();

    while let Some(slot_close) = cursor.checked_add(duration_minutes) {
        if slot_close > close {
            break;
        }
        // Both bounds are <= close <= 24:00, so conversion cannot fail.
        if let (Some(slot_start), Some(slot_end)) =
            (WallTime::from_minutes(cursor), WallTime::from_minutes(slot_close))
        {
            slots.push(TimeSlot::new(slot_start, slot_end));
        }
        let Some(next) = cursor.checked_add(step) else {
            break;
        };
        cursor = next;
    }

    slots
}

/// Resolve what a given event type offers on a given date.
///
/// Fixed-time event types bypass the grid and offer their literal window on
/// every open weekday. Closed weekdays offer nothing for any event type.
pub fn resolve_day_slots(
    date: NaiveDate,
    event_type: &EventType,
    config: &SchedulingConfig,
) -> DaySlots {
    let Some(hours) = config.working_hours.for_date(date) else {
        return DaySlots::Closed;
    };

    if let Some(fixed) = event_type.fixed_time {
        return DaySlots::Fixed(TimeSlot::from(fixed));
    }

    DaySlots::Generated(generate_slots_with_interval(
        hours.start,
        hours.end,
        event_type.duration,
        config.slot_interval_minutes,
    ))
}
