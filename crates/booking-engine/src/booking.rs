//! Booking records produced when a visitor submits a slot.
//!
//! The availability engine never mutates bookings; this module covers what
//! happens after a slot is chosen: request validation, the status lifecycle,
//! cancellation (optionally of a whole recurring series) and dashboard counts.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::local_today;
use crate::clock::WallTime;
use crate::error::{EngineError, Result};
use crate::event_type::EventType;
use crate::slots::TimeSlot;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Cancelled and completed bookings never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Who is booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// What the booking form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub event_type_id: String,
    pub date: NaiveDate,
    pub time: WallTime,
    pub end_time: WallTime,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default)]
    pub notes: String,
}

impl BookingRequest {
    /// Build a request for a slot the engine offered.
    pub fn for_slot(
        event_type: &EventType,
        date: NaiveDate,
        slot: &TimeSlot,
        guest: Guest,
    ) -> Self {
        Self {
            event_type_id: event_type.id.clone(),
            date,
            time: slot.time,
            end_time: slot.end_time,
            guest_name: guest.name,
            guest_email: guest.email,
            guest_phone: guest.phone,
            notes: guest.notes,
        }
    }

    /// Check the fields the form requires.
    pub fn validate(&self) -> Result<()> {
        if self.event_type_id.trim().is_empty() {
            return Err(EngineError::Validation("event type is required".to_string()));
        }
        if self.guest_name.trim().is_empty() {
            return Err(EngineError::Validation("guest name is required".to_string()));
        }
        let email = self.guest_email.trim();
        if email.is_empty() {
            return Err(EngineError::Validation("guest email is required".to_string()));
        }
        if !email.contains('@') {
            return Err(EngineError::Validation(format!("'{}' is not an email address", email)));
        }
        if self.time >= self.end_time {
            return Err(EngineError::Validation(format!(
                "start {} must be before end {}",
                self.time, self.end_time
            )));
        }
        Ok(())
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub event_type_id: String,
    pub date: NaiveDate,
    pub time: WallTime,
    pub end_time: WallTime,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_group_id: Option<String>,
}

/// Fresh booking id, e.g. `BK-3f2a...`.
pub fn new_booking_id() -> String {
    format!("BK-{}", Uuid::new_v4().simple())
}

/// Fresh recurring group id, e.g. `RG-9c1d...`.
pub fn new_recurring_group_id() -> String {
    format!("RG-{}", Uuid::new_v4().simple())
}

impl Booking {
    /// Create a pending booking from a validated request.
    pub fn from_request(id: impl Into<String>, request: BookingRequest) -> Result<Self> {
        request.validate()?;
        Ok(Self {
            id: id.into(),
            event_type_id: request.event_type_id,
            date: request.date,
            time: request.time,
            end_time: request.end_time,
            guest_name: request.guest_name,
            guest_email: request.guest_email,
            guest_phone: request.guest_phone,
            notes: request.notes,
            status: BookingStatus::Pending,
            recurring_group_id: None,
        })
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring_group_id.is_some()
    }

    /// Start instant, interpreting `date`/`time` in `tz`.
    ///
    /// Returns `None` for a local time skipped by a DST transition.
    pub fn start_in(&self, tz: Tz) -> Option<DateTime<Utc>> {
        let naive = self.date.and_time(self.time.to_naive_time()?);
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn transition(&mut self, allowed_from: &[BookingStatus], to: BookingStatus) -> Result<()> {
        if !allowed_from.contains(&self.status) {
            return Err(EngineError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<()> {
        self.transition(&[BookingStatus::Pending], BookingStatus::Confirmed)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.transition(
            &[BookingStatus::Pending, BookingStatus::Confirmed],
            BookingStatus::Cancelled,
        )
    }

    pub fn complete(&mut self) -> Result<()> {
        self.transition(&[BookingStatus::Confirmed], BookingStatus::Completed)
    }
}

/// Cancel a booking, or its whole recurring series when `cancel_all` is set.
///
/// Series members that are already cancelled or completed are left alone.
/// Returns the ids that were cancelled.
pub fn cancel_booking(bookings: &mut [Booking], id: &str, cancel_all: bool) -> Result<Vec<String>> {
    let target = bookings
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| EngineError::Validation(format!("no booking with id '{}'", id)))?;

    let series = if cancel_all {
        target.recurring_group_id.clone()
    } else {
        None
    };
    let Some(group) = series else {
        target.cancel()?;
        return Ok(vec![target.id.clone()]);
    };

    let mut cancelled = Vec::new();
    for booking in bookings
        .iter_mut()
        .filter(|b| b.recurring_group_id.as_deref() == Some(group.as_str()))
    {
        if !booking.status.is_terminal() {
            booking.cancel()?;
            cancelled.push(booking.id.clone());
        }
    }
    Ok(cancelled)
}

/// Counters shown on the owner dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingStats {
    /// Confirmed bookings on today's date.
    pub today: usize,
    /// Confirmed bookings starting at or after now.
    pub upcoming: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl BookingStats {
    pub fn compute(bookings: &[Booking], now: DateTime<Utc>, tz: Tz) -> Self {
        let today = local_today(now, tz);
        let mut stats = BookingStats::default();
        for b in bookings {
            match b.status {
                BookingStatus::Confirmed => {
                    if b.date == today {
                        stats.today += 1;
                    }
                    if b.start_in(tz).is_some_and(|start| start >= now) {
                        stats.upcoming += 1;
                    }
                }
                BookingStatus::Completed => stats.completed += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
                BookingStatus::Pending => {}
            }
        }
        stats
    }
}
