//! WASM bindings for booking-engine.
//!
//! Exposes slot generation, date eligibility, the month grid and recurrence
//! expansion to the booking page via `wasm-bindgen`. All complex types cross
//! the boundary as JSON strings. An omitted `configJson` means the default
//! scheduling configuration.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::calendar::{day_status, month_view};
use booking_engine::recurring::{expand_recurrence, RecurrenceFrequency};
use booking_engine::slots::{generate_slots_for_day, resolve_day_slots};
use booking_engine::{EventType, SchedulingConfig, SettingsOverlay, WallTime};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DateCheckDto {
    bookable: bool,
    status: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers: parse boundary inputs
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_time(s: &str) -> Result<WallTime, String> {
    s.parse().map_err(|e| format!("{}", e))
}

/// Build a configuration from an optional persisted-settings JSON overlay.
fn parse_config(json: Option<&str>) -> Result<SchedulingConfig, String> {
    match json {
        None => Ok(SchedulingConfig::default()),
        Some(raw) if raw.trim().is_empty() => Ok(SchedulingConfig::default()),
        Some(raw) => SettingsOverlay::from_json(raw)
            .map(|overlay| SchedulingConfig::default().with_overlay(overlay))
            .map_err(|e| format!("Invalid config JSON: {}", e)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-independent implementations
// ---------------------------------------------------------------------------

fn slots_for_window(start: &str, end: &str, duration_minutes: u32) -> Result<String, String> {
    let slots = generate_slots_for_day(parse_time(start)?, parse_time(end)?, duration_minutes);
    to_json(&slots)
}

fn slots_for_day(
    date: &str,
    event_type_json: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let date = parse_date(date)?;
    let event_type: EventType = serde_json::from_str(event_type_json)
        .map_err(|e| format!("Invalid event type JSON: {}", e))?;
    let config = parse_config(config_json)?;
    to_json(&resolve_day_slots(date, &event_type, &config).into_slots())
}

fn check_date(date: &str, today: &str, config_json: Option<&str>) -> Result<String, String> {
    let config = parse_config(config_json)?;
    let status = day_status(parse_date(date)?, parse_date(today)?, &config);
    to_json(&DateCheckDto {
        bookable: status.is_bookable(),
        status: status.as_str(),
    })
}

fn month_grid(
    year: i32,
    month: u32,
    today: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let config = parse_config(config_json)?;
    let view = month_view(year, month, parse_date(today)?, &config).map_err(|e| e.to_string())?;
    to_json(&view)
}

fn recurrence(
    start_date: &str,
    time: &str,
    duration_minutes: u32,
    frequency: &str,
    occurrences: u32,
    timezone: &str,
) -> Result<String, String> {
    let frequency: RecurrenceFrequency = frequency.parse().map_err(|e| format!("{}", e))?;
    let series = expand_recurrence(
        parse_date(start_date)?,
        parse_time(time)?,
        duration_minutes,
        frequency,
        occurrences,
        timezone,
    )
    .map_err(|e| e.to_string())?;
    to_json(&series)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Candidate slots between two `HH:MM` bounds on the 30-minute grid.
///
/// Returns a JSON array of `{time, endTime, display}` objects.
#[wasm_bindgen(js_name = "generateSlotsForDay")]
pub fn generate_slots(start: &str, end: &str, duration_minutes: u32) -> Result<String, JsValue> {
    slots_for_window(start, end, duration_minutes).map_err(|e| JsValue::from_str(&e))
}

/// Slots an event type offers on `date` (`YYYY-MM-DD`).
///
/// `event_type_json` is a single event type object. Fixed-time event types
/// yield their one window on open days.
#[wasm_bindgen(js_name = "resolveDaySlots")]
pub fn resolve_slots(
    date: &str,
    event_type_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    slots_for_day(date, event_type_json, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether `date` is selectable when the current date is `today`.
///
/// Returns `{bookable, status}` where `status` is one of `past`,
/// `beyond_window`, `closed`, `open`.
#[wasm_bindgen(js_name = "isDateBookable")]
pub fn is_date_bookable(
    date: &str,
    today: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    check_date(date, today, config_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Month grid (Sunday-first) with per-day status.
#[wasm_bindgen(js_name = "monthView")]
pub fn month_view_json(
    year: i32,
    month: u32,
    today: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    month_grid(year, month, today, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Occurrences of a recurring booking (`weekly`, `biweekly`, `monthly`).
#[wasm_bindgen(js_name = "expandRecurrence")]
pub fn expand_recurrence_json(
    start_date: &str,
    time: &str,
    duration_minutes: u32,
    frequency: &str,
    occurrences: u32,
    timezone: &str,
) -> Result<String, JsValue> {
    recurrence(start_date, time, duration_minutes, frequency, occurrences, timezone)
        .map_err(|e| JsValue::from_str(&e))
}
