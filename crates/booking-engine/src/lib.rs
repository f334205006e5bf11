//! # booking-engine
//!
//! Deterministic availability computation for appointment booking pages.
//!
//! Given a business's per-weekday working hours and an event type's duration,
//! the engine derives the candidate time slots a visitor may pick on a day,
//! decides which calendar dates are selectable within the advance-booking
//! window, and expands recurring bookings. Everything is a pure function of an
//! explicit [`SchedulingConfig`]; there is no global state.
//!
//! ## Modules
//!
//! - [`clock`] — `HH:MM` wall-clock times
//! - [`config`] — Working hours, scheduling settings, persisted-settings overlay
//! - [`event_type`] — Event type catalog and fixed-time offerings
//! - [`slots`] — Slot grid generation and per-day resolution
//! - [`calendar`] — Date eligibility and month layout
//! - [`source`] — Availability data sources (local, randomized demo, precomputed)
//! - [`recurring`] — Recurring booking expansion
//! - [`booking`] — Booking requests, lifecycle, and dashboard stats
//! - [`error`] — Error types

pub mod booking;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod event_type;
pub mod recurring;
pub mod slots;
pub mod source;

pub use booking::{cancel_booking, Booking, BookingRequest, BookingStats, BookingStatus, Guest};
pub use calendar::{day_status, is_date_bookable, local_today, month_view, DayStatus};
pub use clock::WallTime;
pub use config::{SchedulingConfig, SettingsOverlay, WorkingHours, WorkingHoursTable};
pub use error::EngineError;
pub use event_type::{EventType, FixedTime, LocationType};
pub use recurring::{expand_recurrence, plan_recurring_bookings, Occurrence, RecurrenceFrequency};
pub use slots::{generate_slots_for_day, resolve_day_slots, DaySlots, TimeSlot};
pub use source::{AvailabilitySource, LocalSource, PrecomputedSource, RandomizedSource, SlotMap};
