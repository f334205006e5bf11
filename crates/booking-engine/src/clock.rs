//! Wall-clock times of day ("HH:MM") used by working hours and slots.
//!
//! A [`WallTime`] is a count of minutes since local midnight. It carries no
//! date and no timezone; callers attach those when a slot becomes a booking.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Minutes in a day. `24:00` is representable as a closing bound.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute precision, `00:00..=24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(u32);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);
    pub const END_OF_DAY: WallTime = WallTime(MINUTES_PER_DAY);

    /// Build from hour and minute. Returns `None` past `24:00`.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Build from minutes since midnight. Returns `None` past `24:00`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(WallTime(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Add minutes, returning `None` if the result passes `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        self.0.checked_add(minutes).and_then(Self::from_minutes)
    }

    /// Convert to a `NaiveTime`. `24:00` has no `NaiveTime` form.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
    }
}

impl From<NaiveTime> for WallTime {
    fn from(t: NaiveTime) -> Self {
        use chrono::Timelike;
        WallTime(t.hour() * 60 + t.minute())
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = EngineError;

    /// Parse `"H:MM"` or `"HH:MM"` (24-hour clock).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTime(s.to_string());

        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;

        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for WallTime {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<WallTime> for String {
    fn from(t: WallTime) -> Self {
        t.to_string()
    }
}
