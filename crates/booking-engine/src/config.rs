//! Scheduling configuration passed explicitly into every engine call.
//!
//! [`SchedulingConfig::default`] carries the stock settings of a fresh booking
//! page. Persisted owner settings arrive as a partial [`SettingsOverlay`] and
//! are merged once at startup with [`SchedulingConfig::with_overlay`]; the
//! engine itself never reads global state.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::WallTime;
use crate::error::{EngineError, Result};
use crate::event_type::{default_event_types, find_event_type, EventType};

pub const DEFAULT_ADVANCE_BOOKING_DAYS: u32 = 60;
pub const DEFAULT_MIN_NOTICE_HOURS: u32 = 24;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;
pub const DEFAULT_MAX_RECURRING_OCCURRENCES: u32 = 12;

/// Opening and closing time for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: WallTime,
    pub end: WallTime,
}

impl WorkingHours {
    pub fn new(start: WallTime, end: WallTime) -> Self {
        Self { start, end }
    }
}

/// Working hours per weekday, indexed 0 = Sunday .. 6 = Saturday.
///
/// `None` means the business is closed that day. Serialized as a map keyed
/// `"0"`..`"6"` with `null` for closed days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Option<WorkingHours>>",
    into = "BTreeMap<String, Option<WorkingHours>>"
)]
pub struct WorkingHoursTable([Option<WorkingHours>; 7]);

impl WorkingHoursTable {
    /// A table with every day closed.
    pub fn closed() -> Self {
        Self([None; 7])
    }

    /// Monday through Friday with the same hours, weekend closed.
    pub fn weekdays(start: WallTime, end: WallTime) -> Self {
        let mut table = Self::closed();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            table.set(day, Some(WorkingHours::new(start, end)));
        }
        table
    }

    pub fn set(&mut self, weekday: Weekday, hours: Option<WorkingHours>) {
        self.0[weekday.num_days_from_sunday() as usize] = hours;
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<WorkingHours> {
        self.0[weekday.num_days_from_sunday() as usize]
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<WorkingHours> {
        self.for_weekday(date.weekday())
    }

    pub fn is_open(&self, date: NaiveDate) -> bool {
        self.for_date(date).is_some()
    }
}

/// Parse a `"0"`..`"6"` weekday key (0 = Sunday).
fn weekday_from_key(key: &str) -> Option<Weekday> {
    let index: u8 = key.trim().parse().ok()?;
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

impl TryFrom<BTreeMap<String, Option<WorkingHours>>> for WorkingHoursTable {
    type Error = EngineError;

    fn try_from(map: BTreeMap<String, Option<WorkingHours>>) -> Result<Self> {
        let mut table = Self::closed();
        for (key, hours) in map {
            let weekday = weekday_from_key(&key).ok_or_else(|| {
                EngineError::InvalidDate(format!("unknown weekday key '{}'", key))
            })?;
            table.set(weekday, hours);
        }
        Ok(table)
    }
}

impl From<WorkingHoursTable> for BTreeMap<String, Option<WorkingHours>> {
    fn from(table: WorkingHoursTable) -> Self {
        table
            .0
            .iter()
            .enumerate()
            .map(|(i, hours)| (i.to_string(), *hours))
            .collect()
    }
}

/// Everything the availability engine needs to know about the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub working_hours: WorkingHoursTable,
    /// How many days past today a date may be booked.
    pub advance_booking_days: u32,
    /// Minimum lead time for a booking. Carried for callers; not enforced.
    pub min_notice_hours: u32,
    /// Step between candidate slot starts.
    pub slot_interval_minutes: u32,
    pub buffer_before_minutes: u32,
    pub buffer_after_minutes: u32,
    /// Zone whose calendar date counts as "today".
    pub timezone: Tz,
    pub max_recurring_occurrences: u32,
    pub event_types: Vec<EventType>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        let nine = WallTime::from_hm(9, 0).unwrap_or(WallTime::MIDNIGHT);
        let five = WallTime::from_hm(17, 0).unwrap_or(WallTime::END_OF_DAY);
        Self {
            working_hours: WorkingHoursTable::weekdays(nine, five),
            advance_booking_days: DEFAULT_ADVANCE_BOOKING_DAYS,
            min_notice_hours: DEFAULT_MIN_NOTICE_HOURS,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            timezone: chrono_tz::Asia::Bangkok,
            max_recurring_occurrences: DEFAULT_MAX_RECURRING_OCCURRENCES,
            event_types: default_event_types(),
        }
    }
}

impl SchedulingConfig {
    /// Look up an event type in this configuration's catalog.
    pub fn event_type(&self, id: &str) -> Result<&EventType> {
        find_event_type(&self.event_types, id)
            .ok_or_else(|| EngineError::UnknownEventType(id.to_string()))
    }

    /// Merge persisted settings over this configuration.
    ///
    /// Fields absent from the overlay keep their current value. In the
    /// working-hours map, a weekday mapped to `null` becomes closed and an
    /// absent weekday keeps its hours. Unknown weekday keys are ignored.
    pub fn with_overlay(mut self, overlay: SettingsOverlay) -> Self {
        if let Some(hours) = overlay.working_hours {
            for (key, value) in hours {
                match weekday_from_key(&key) {
                    Some(weekday) => self.working_hours.set(weekday, value),
                    None => warn!(key = %key, "ignoring unknown weekday in working hours"),
                }
            }
        }
        if let Some(v) = overlay.advance_booking_days {
            self.advance_booking_days = v;
        }
        if let Some(v) = overlay.min_notice_hours {
            self.min_notice_hours = v;
        }
        if let Some(v) = overlay.slot_interval_minutes {
            self.slot_interval_minutes = v;
        }
        if let Some(v) = overlay.buffer_before_minutes {
            self.buffer_before_minutes = v;
        }
        if let Some(v) = overlay.buffer_after_minutes {
            self.buffer_after_minutes = v;
        }
        if let Some(v) = overlay.timezone {
            self.timezone = v;
        }
        if let Some(v) = overlay.max_recurring_occurrences {
            self.max_recurring_occurrences = v;
        }
        if let Some(v) = overlay.event_types {
            self.event_types = v;
        }
        self
    }
}

/// Partial settings as persisted by the owner's settings page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverlay {
    #[serde(default)]
    pub working_hours: Option<BTreeMap<String, Option<WorkingHours>>>,
    #[serde(default)]
    pub advance_booking_days: Option<u32>,
    #[serde(default)]
    pub min_notice_hours: Option<u32>,
    #[serde(default)]
    pub slot_interval_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_before_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_after_minutes: Option<u32>,
    #[serde(default)]
    pub timezone: Option<Tz>,
    #[serde(default)]
    pub max_recurring_occurrences: Option<u32>,
    #[serde(default)]
    pub event_types: Option<Vec<EventType>>,
}

impl SettingsOverlay {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> WallTime {
        s.parse().unwrap()
    }

    #[test]
    fn default_week_is_monday_to_friday_nine_to_five() {
        let config = SchedulingConfig::default();
        assert!(config.working_hours.for_weekday(Weekday::Sun).is_none());
        assert!(config.working_hours.for_weekday(Weekday::Sat).is_none());
        let monday = config.working_hours.for_weekday(Weekday::Mon).unwrap();
        assert_eq!(monday, WorkingHours::new(t("09:00"), t("17:00")));
        assert_eq!(config.advance_booking_days, 60);
        assert_eq!(config.slot_interval_minutes, 30);
    }

    #[test]
    fn table_serializes_with_sunday_first_keys() {
        let table = WorkingHoursTable::weekdays(t("09:00"), t("17:00"));
        let json = serde_json::to_value(table).unwrap();
        assert!(json["0"].is_null());
        assert_eq!(json["1"]["start"], "09:00");
        assert!(json["6"].is_null());
    }

    #[test]
    fn overlay_null_closes_day_and_absent_key_keeps_it() {
        let overlay = SettingsOverlay::from_json(
            r#"{"working_hours":{"5":null,"6":{"start":"10:00","end":"14:00"}},
                "advance_booking_days":30}"#,
        )
        .unwrap();
        let config = SchedulingConfig::default().with_overlay(overlay);

        assert!(config.working_hours.for_weekday(Weekday::Fri).is_none());
        assert_eq!(
            config.working_hours.for_weekday(Weekday::Sat),
            Some(WorkingHours::new(t("10:00"), t("14:00")))
        );
        assert!(config.working_hours.for_weekday(Weekday::Mon).is_some());
        assert_eq!(config.advance_booking_days, 30);
        assert_eq!(config.min_notice_hours, DEFAULT_MIN_NOTICE_HOURS);
    }

    #[test]
    fn unknown_weekday_key_is_rejected_in_full_table() {
        let result: std::result::Result<WorkingHoursTable, _> =
            serde_json::from_str(r#"{"7":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_event_type_is_an_error() {
        let config = SchedulingConfig::default();
        assert!(config.event_type("meeting-30").is_ok());
        assert!(matches!(
            config.event_type("nope"),
            Err(EngineError::UnknownEventType(_))
        ));
    }
}
