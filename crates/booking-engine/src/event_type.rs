//! Event types offered by the booking page.

use serde::{Deserialize, Serialize};

use crate::clock::WallTime;

/// Durations at or above this many minutes are shown as a full day.
const ALL_DAY_MINUTES: u32 = 420;

/// How the meeting takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    #[default]
    GoogleMeet,
    Zoom,
    Phone,
    InPerson,
}

impl LocationType {
    pub fn label(self) -> &'static str {
        match self {
            LocationType::GoogleMeet => "Google Meet",
            LocationType::Zoom => "Zoom",
            LocationType::Phone => "Phone",
            LocationType::InPerson => "In person",
        }
    }
}

/// A literal time window that replaces grid generation for an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTime {
    pub start: WallTime,
    pub end: WallTime,
}

/// A bookable kind of meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: String,
    pub name: String,
    /// Length of one booking in minutes.
    pub duration: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub location_type: LocationType,
    /// When set, the event is offered once per open day at exactly this window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_time: Option<FixedTime>,
}

impl EventType {
    /// Human-readable duration, e.g. `"45 min"`, `"1 hr 30 min"`, `"All day"`.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }
}

/// Render a minute count the way the booking page shows it.
pub fn format_duration(minutes: u32) -> String {
    if minutes >= ALL_DAY_MINUTES {
        return "All day".to_string();
    }
    if minutes >= 60 {
        let hours = minutes / 60;
        let mins = minutes % 60;
        return if mins > 0 {
            format!("{} hr {} min", hours, mins)
        } else {
            format!("{} hr", hours)
        };
    }
    format!("{} min", minutes)
}

/// The catalog shipped with a fresh installation.
pub fn default_event_types() -> Vec<EventType> {
    vec![
        EventType {
            id: "meeting-30".to_string(),
            name: "Quick meeting".to_string(),
            duration: 30,
            description: "A short 30 minute meeting".to_string(),
            color: "#0069ff".to_string(),
            location_type: LocationType::GoogleMeet,
            fixed_time: None,
        },
        EventType {
            id: "meeting-60".to_string(),
            name: "In-depth meeting".to_string(),
            duration: 60,
            description: "A one hour deep-dive meeting".to_string(),
            color: "#10b981".to_string(),
            location_type: LocationType::GoogleMeet,
            fixed_time: None,
        },
        EventType {
            id: "consultation".to_string(),
            name: "Consultation".to_string(),
            duration: 45,
            description: "Talk through a work question".to_string(),
            color: "#f59e0b".to_string(),
            location_type: LocationType::Phone,
            fixed_time: None,
        },
    ]
}

/// Look up an event type by id.
pub fn find_event_type<'a>(catalog: &'a [EventType], id: &str) -> Option<&'a EventType> {
    catalog.iter().find(|e| e.id == id)
}
