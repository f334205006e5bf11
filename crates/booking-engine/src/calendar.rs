//! Which calendar dates a visitor may pick.
//!
//! A date is bookable when it lies in `[today, today + advance_booking_days]`
//! and its weekday has working hours. "Today" is a calendar date: the time of
//! day is irrelevant, so today itself is always in range. The configured
//! minimum notice is not consulted here.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::SchedulingConfig;
use crate::error::{EngineError, Result};

/// Why a date is or is not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Past,
    BeyondWindow,
    Closed,
    Open,
}

impl DayStatus {
    pub fn is_bookable(self) -> bool {
        self == DayStatus::Open
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Past => "past",
            DayStatus::BeyondWindow => "beyond_window",
            DayStatus::Closed => "closed",
            DayStatus::Open => "open",
        }
    }
}

/// One cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub is_today: bool,
}

/// A month laid out Sunday-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (0 when the month starts on Sunday).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

/// The calendar date of `now` in `tz`.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Last date that may still be booked.
pub fn last_bookable_date(today: NaiveDate, config: &SchedulingConfig) -> NaiveDate {
    today
        .checked_add_signed(Duration::days(i64::from(config.advance_booking_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Classify a date relative to `today`.
pub fn day_status(date: NaiveDate, today: NaiveDate, config: &SchedulingConfig) -> DayStatus {
    if date < today {
        DayStatus::Past
    } else if date > last_bookable_date(today, config) {
        DayStatus::BeyondWindow
    } else if !config.working_hours.is_open(date) {
        DayStatus::Closed
    } else {
        DayStatus::Open
    }
}

/// Whether `date` may be selected when the current date is `today`.
pub fn is_date_bookable(date: NaiveDate, today: NaiveDate, config: &SchedulingConfig) -> bool {
    day_status(date, today, config).is_bookable()
}

/// Every bookable date in `[from, to]`, ascending.
pub fn bookable_dates(
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
    config: &SchedulingConfig,
) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| is_date_bookable(*d, today, config))
        .collect()
}

/// Lay out `year`/`month` with per-day status.
pub fn month_view(
    year: i32,
    month: u32,
    today: NaiveDate,
    config: &SchedulingConfig,
) -> Result<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidDate(format!("{:04}-{:02}", year, month)))?;

    let days = first
        .iter_days()
        .take_while(|d| *d < next_month)
        .map(|date| CalendarDay {
            date,
            status: day_status(date, today, config),
            is_today: date == today,
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
