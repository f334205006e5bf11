//! Error types for booking-engine operations.

use thiserror::Error;

use crate::booking::BookingStatus;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Invalid booking: {0}")]
    Validation(String),

    #[error("Booking {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Requested {requested} occurrences, at most {max} allowed")]
    TooManyOccurrences { requested: u32, max: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
