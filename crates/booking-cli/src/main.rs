//! `booking` CLI — query bookable dates, time slots and recurring series.
//!
//! ## Usage
//!
//! ```sh
//! # List the configured event types
//! booking event-types
//!
//! # Slots for one day
//! booking slots --date 2026-03-16 --event-type meeting-60
//!
//! # Slot map for a range, using the randomized demo source
//! booking range --from 2026-03-16 --to 2026-03-20 --event-type meeting-30 --mock --seed 7
//!
//! # Month grid with per-day status
//! booking calendar --month 2026-03
//!
//! # Is a date selectable?
//! booking check --date 2026-03-22
//!
//! # Expand a weekly series
//! booking recurring --date 2026-03-16 --time 10:00 --event-type meeting-60 \
//!     --frequency weekly --occurrences 4
//!
//! # Override settings from a file and the environment
//! BOOKING__ADVANCE_BOOKING_DAYS=30 booking --config settings.json calendar --month 2026-04
//! ```

use anyhow::{Context, Result};
use booking_engine::calendar::{day_status, local_today, month_view, DayStatus};
use booking_engine::recurring::{expand_recurrence, RecurrenceFrequency};
use booking_engine::slots::resolve_day_slots;
use booking_engine::source::{AvailabilitySource, LocalSource, RandomizedSource};
use booking_engine::{EventType, SchedulingConfig, SettingsOverlay, WallTime};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Appointment availability from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON, TOML or YAML) merged over the defaults
    #[arg(long, global = true)]
    config: Option<String>,

    /// Treat this date as today (defaults to the current date in the configured timezone)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the event type catalog, with display labels, as JSON
    EventTypes,
    /// Print the bookable slots for one date as JSON
    Slots {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        event_type: String,
    },
    /// Print a date -> slots map for a date range as JSON
    Range {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        event_type: String,
        /// Randomly hide slots to imitate existing bookings
        #[arg(long)]
        mock: bool,
        /// Seed for --mock, for reproducible output
        #[arg(long, requires = "mock")]
        seed: Option<u64>,
    },
    /// Print every day of a month with its status
    Calendar {
        /// Month as YYYY-MM
        #[arg(long)]
        month: String,
    },
    /// Report whether a date can be booked
    Check {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Print the occurrences of a recurring booking as JSON
    Recurring {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        time: WallTime,
        #[arg(long)]
        event_type: String,
        #[arg(long, default_value = "weekly")]
        frequency: RecurrenceFrequency,
        #[arg(long, default_value_t = 4)]
        occurrences: u32,
    },
}

/// Catalog entry as printed by `event-types`.
#[derive(Serialize)]
struct EventTypeSummary<'a> {
    #[serde(flatten)]
    event_type: &'a EventType,
    duration_label: String,
    location_label: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_settings(cli.config.as_deref())?;
    let today = cli
        .today
        .unwrap_or_else(|| local_today(Utc::now(), config.timezone));
    debug!(%today, timezone = %config.timezone, "resolved today");

    match cli.command {
        Commands::EventTypes => {
            let catalog: Vec<EventTypeSummary> = config
                .event_types
                .iter()
                .map(|event_type| EventTypeSummary {
                    duration_label: event_type.duration_label(),
                    location_label: event_type.location_type.label(),
                    event_type,
                })
                .collect();
            print_json(&catalog)?;
        }
        Commands::Slots { date, event_type } => {
            let event_type = config.event_type(&event_type)?;
            match day_status(date, today, &config) {
                DayStatus::Past | DayStatus::BeyondWindow => {
                    anyhow::bail!(
                        "{} is not bookable: {}",
                        date,
                        day_status(date, today, &config).as_str()
                    );
                }
                DayStatus::Closed | DayStatus::Open => {
                    let slots = resolve_day_slots(date, event_type, &config).into_slots();
                    print_json(&slots)?;
                }
            }
        }
        Commands::Range {
            from,
            to,
            event_type,
            mock,
            seed,
        } => {
            let event_type = config.event_type(&event_type)?.clone();
            let map = match (mock, seed) {
                (false, _) => LocalSource::new(config).available_slots(&event_type, from, to)?,
                (true, Some(seed)) => {
                    RandomizedSource::seeded(config, seed).available_slots(&event_type, from, to)?
                }
                (true, None) => {
                    RandomizedSource::new(config).available_slots(&event_type, from, to)?
                }
            };
            print_json(&map)?;
        }
        Commands::Calendar { month } => {
            let (year, month) = parse_month(&month)?;
            let view = month_view(year, month, today, &config)?;
            for day in &view.days {
                if day.is_today {
                    println!("{} {} (today)", day.date, day.status.as_str());
                } else {
                    println!("{} {}", day.date, day.status.as_str());
                }
            }
        }
        Commands::Check { date } => {
            let status = day_status(date, today, &config);
            if status.is_bookable() {
                println!("bookable");
            } else {
                println!("not bookable ({})", status.as_str());
            }
        }
        Commands::Recurring {
            date,
            time,
            event_type,
            frequency,
            occurrences,
        } => {
            let event_type = config.event_type(&event_type)?;
            if occurrences > config.max_recurring_occurrences {
                anyhow::bail!(
                    "at most {} occurrences allowed, got {}",
                    config.max_recurring_occurrences,
                    occurrences
                );
            }
            let series = expand_recurrence(
                date,
                time,
                event_type.duration,
                frequency,
                occurrences,
                config.timezone.name(),
            )?;
            print_json(&series)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the settings file, then `BOOKING__*` environment variables.
fn load_settings(path: Option<&str>) -> Result<SchedulingConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(Path::new(path)).required(true));
    }
    builder = builder.add_source(config::Environment::with_prefix("BOOKING").separator("__"));

    let overlay: SettingsOverlay = builder
        .build()
        .with_context(|| format!("Failed to load settings from {}", path.unwrap_or("environment")))?
        .try_deserialize()
        .context("Failed to parse settings")?;

    Ok(SchedulingConfig::default().with_overlay(overlay))
}

/// Parse `YYYY-MM`.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("Invalid month '{}': expected YYYY-MM", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{}'", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{}'", raw))?;
    Ok((year, month))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
