//! Recurring booking expansion.
//!
//! A recurring booking repeats the same wall-clock time every 7, 14 or 30
//! days. Expansion goes through the `rrule` crate with a `TZID`-anchored
//! DTSTART, so occurrences keep their local time across DST changes.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::booking::{
    new_booking_id, new_recurring_group_id, Booking, BookingRequest, BookingStatus,
};
use crate::clock::WallTime;
use crate::config::SchedulingConfig;
use crate::error::{EngineError, Result};

/// How often a recurring booking repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    #[default]
    Weekly,
    Biweekly,
    /// Every 30 days, not the same day-of-month.
    Monthly,
}

impl RecurrenceFrequency {
    pub fn interval_days(self) -> u32 {
        match self {
            RecurrenceFrequency::Weekly => 7,
            RecurrenceFrequency::Biweekly => 14,
            RecurrenceFrequency::Monthly => 30,
        }
    }
}

impl std::str::FromStr for RecurrenceFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(RecurrenceFrequency::Weekly),
            "biweekly" => Ok(RecurrenceFrequency::Biweekly),
            "monthly" => Ok(RecurrenceFrequency::Monthly),
            other => Err(EngineError::InvalidRule(format!(
                "unknown frequency '{}' (expected weekly, biweekly or monthly)",
                other
            ))),
        }
    }
}

/// One concrete instance of a recurring booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Local start time.
    pub time: WallTime,
    /// Local end time.
    pub end_time: WallTime,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Expand a recurring booking into its occurrences.
///
/// # Arguments
/// - `start_date` -- Date of the first occurrence
/// - `time` -- Local start time, repeated on every occurrence
/// - `duration_minutes` -- Length of each occurrence
/// - `frequency` -- Repeat interval
/// - `occurrences` -- Number of instances to produce (0 yields none)
/// - `timezone` -- IANA timezone the wall-clock time belongs to
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` for an unknown IANA name,
/// `EngineError::InvalidTime` for a `24:00` start, and
/// `EngineError::InvalidRule` if the generated rule fails to parse.
pub fn expand_recurrence(
    start_date: NaiveDate,
    time: WallTime,
    duration_minutes: u32,
    frequency: RecurrenceFrequency,
    occurrences: u32,
    timezone: &str,
) -> Result<Vec<Occurrence>> {
    if occurrences == 0 {
        return Ok(Vec::new());
    }

    let tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))?;

    let start_time = time
        .to_naive_time()
        .ok_or_else(|| EngineError::InvalidTime(time.to_string()))?;
    let dtstart = start_date.and_time(start_time).format("%Y%m%dT%H%M%S");

    let rrule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:FREQ=DAILY;INTERVAL={};COUNT={}",
        timezone,
        dtstart,
        frequency.interval_days(),
        occurrences
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| EngineError::InvalidRule(format!("{}", e)))?;

    let limit = u16::try_from(occurrences).unwrap_or(u16::MAX);
    let instances = rrule_set.all(limit);
    let duration = Duration::minutes(i64::from(duration_minutes));

    let result: Vec<Occurrence> = instances
        .dates
        .into_iter()
        .map(|dt| {
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            let end = start + duration;
            let local_start = start.with_timezone(&tz);
            let local_end = end.with_timezone(&tz);
            // An occurrence ending exactly at midnight closes its own day.
            let end_time = if local_end.date_naive() > local_start.date_naive()
                && local_end.num_seconds_from_midnight() == 0
            {
                WallTime::END_OF_DAY
            } else {
                WallTime::from(local_end.time())
            };
            Occurrence {
                date: local_start.date_naive(),
                time: WallTime::from(local_start.time()),
                end_time,
                start,
                end,
            }
        })
        .collect();

    debug!(
        %start_date,
        ?frequency,
        requested = occurrences,
        produced = result.len(),
        "expanded recurrence"
    );

    Ok(result)
}

/// Bookings created for one recurring request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPlan {
    pub recurring_group_id: String,
    pub bookings: Vec<Booking>,
}

/// Turn a booking request into a series of pending bookings.
///
/// The request's date and time anchor the first occurrence; its duration is
/// `end_time - time`. Every booking shares one `recurring_group_id`.
pub fn plan_recurring_bookings(
    request: &BookingRequest,
    frequency: RecurrenceFrequency,
    occurrences: u32,
    config: &SchedulingConfig,
) -> Result<RecurringPlan> {
    request.validate()?;
    if occurrences > config.max_recurring_occurrences {
        return Err(EngineError::TooManyOccurrences {
            requested: occurrences,
            max: config.max_recurring_occurrences,
        });
    }

    let duration = request.end_time.minutes() - request.time.minutes();
    let instances = expand_recurrence(
        request.date,
        request.time,
        duration,
        frequency,
        occurrences,
        config.timezone.name(),
    )?;

    let recurring_group_id = new_recurring_group_id();
    let bookings = instances
        .into_iter()
        .map(|occ| Booking {
            id: new_booking_id(),
            event_type_id: request.event_type_id.clone(),
            date: occ.date,
            time: occ.time,
            end_time: occ.end_time,
            guest_name: request.guest_name.clone(),
            guest_email: request.guest_email.clone(),
            guest_phone: request.guest_phone.clone(),
            notes: request.notes.clone(),
            status: BookingStatus::Pending,
            recurring_group_id: Some(recurring_group_id.clone()),
        })
        .collect();

    Ok(RecurringPlan {
        recurring_group_id,
        bookings,
    })
}
