//! Availability data sources.
//!
//! The booking page asks a source for every open day in a date range and gets
//! back a [`SlotMap`]. Three sources share the same day resolution
//! ([`resolve_day_slots`]):
//!
//! - [`LocalSource`] — deterministic, straight from the configuration.
//! - [`RandomizedSource`] — demo stand-in that drops each candidate with a
//!   fixed probability to imitate existing bookings. Not idempotent.
//! - [`PrecomputedSource`] — serves a per-date map already computed by a
//!   remote backend.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::WallTime;
use crate::config::SchedulingConfig;
use crate::error::Result;
use crate::event_type::EventType;
use crate::slots::{resolve_day_slots, DaySlots, TimeSlot};

/// Slots per open date, ordered by date.
pub type SlotMap = BTreeMap<NaiveDate, Vec<TimeSlot>>;

/// Probability that the demo source hides a candidate slot.
pub const DEFAULT_REJECTION_PROBABILITY: f64 = 0.2;

/// Something that can answer "which slots are free between these dates?".
pub trait AvailabilitySource {
    /// Slots for every open day in `[from, to]`. Closed days have no entry.
    fn available_slots(
        &mut self,
        event_type: &EventType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SlotMap>;
}

/// Walk `[from, to]` and collect the resolved offering of each open day.
fn scan_range<F>(
    config: &SchedulingConfig,
    event_type: &EventType,
    from: NaiveDate,
    to: NaiveDate,
    mut keep: F,
) -> SlotMap
where
    F: FnMut(&TimeSlot) -> bool,
{
    let mut map = SlotMap::new();
    for date in from.iter_days().take_while(|d| *d <= to) {
        let offering = resolve_day_slots(date, event_type, config);
        if offering == DaySlots::Closed {
            continue;
        }
        let slots: Vec<TimeSlot> = offering.into_slots().into_iter().filter(|s| keep(s)).collect();
        map.insert(date, slots);
    }
    map
}

/// Deterministic source computed from configuration alone.
#[derive(Debug, Clone)]
pub struct LocalSource {
    config: SchedulingConfig,
}

impl LocalSource {
    pub fn new(config: SchedulingConfig) -> Self {
        Self { config }
    }
}

impl AvailabilitySource for LocalSource {
    fn available_slots(
        &mut self,
        event_type: &EventType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SlotMap> {
        let map = scan_range(&self.config, event_type, from, to, |_| true);
        debug!(
            event_type = %event_type.id,
            %from,
            %to,
            days = map.len(),
            "computed local availability"
        );
        Ok(map)
    }
}

/// Demo source that randomly hides candidates.
///
/// Every open day still gets an entry, even if all of its slots were hidden.
#[derive(Debug, Clone)]
pub struct RandomizedSource<R = ThreadRng> {
    config: SchedulingConfig,
    rng: R,
    rejection_probability: f64,
}

impl RandomizedSource<ThreadRng> {
    pub fn new(config: SchedulingConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl RandomizedSource<StdRng> {
    /// Reproducible variant for demos and tests.
    pub fn seeded(config: SchedulingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomizedSource<R> {
    pub fn with_rng(config: SchedulingConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            rejection_probability: DEFAULT_REJECTION_PROBABILITY,
        }
    }

    /// Override the per-slot rejection probability, clamped to `[0, 1]`.
    pub fn rejection_probability(mut self, p: f64) -> Self {
        self.rejection_probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self
    }
}

impl<R: Rng> AvailabilitySource for RandomizedSource<R> {
    fn available_slots(
        &mut self,
        event_type: &EventType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SlotMap> {
        let p = self.rejection_probability;
        let rng = &mut self.rng;
        let map = scan_range(&self.config, event_type, from, to, |slot| {
            let keep = !rng.gen_bool(p);
            if !keep {
                trace!(time = %slot.time, "hiding slot");
            }
            keep
        });
        debug!(
            event_type = %event_type.id,
            %from,
            %to,
            days = map.len(),
            "computed randomized availability"
        );
        Ok(map)
    }
}

/// One entry of a remote availability payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSlot {
    pub time: WallTime,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

/// Serves availability that a backend already computed per date.
///
/// Payload shape: `{"YYYY-MM-DD": [{"time": "HH:MM", "available": true}, ...]}`.
/// End times are derived from the event type; unavailable entries are dropped.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSource {
    days: BTreeMap<NaiveDate, Vec<RemoteSlot>>,
}

impl PrecomputedSource {
    pub fn new(days: BTreeMap<NaiveDate, Vec<RemoteSlot>>) -> Self {
        Self { days }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl AvailabilitySource for PrecomputedSource {
    fn available_slots(
        &mut self,
        event_type: &EventType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SlotMap> {
        let mut map = SlotMap::new();
        if from > to {
            return Ok(map);
        }
        for (date, entries) in self.days.range(from..=to) {
            let mut slots: Vec<TimeSlot> = entries
                .iter()
                .filter(|e| e.available)
                .filter_map(|e| match event_type.fixed_time {
                    Some(fixed) => Some(TimeSlot::from(fixed)),
                    None => e
                        .time
                        .checked_add_minutes(event_type.duration)
                        .map(|end| TimeSlot::new(e.time, end)),
                })
                .collect();
            slots.sort_by_key(|s| s.time);
            slots.dedup_by_key(|s| s.time);
            map.insert(*date, slots);
        }
        debug!(
            event_type = %event_type.id,
            %from,
            %to,
            days = map.len(),
            "served precomputed availability"
        );
        Ok(map)
    }
}
