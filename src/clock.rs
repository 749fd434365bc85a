//! Clock engine: local wall-clock time from a fixed UTC offset.
//!
//! The offset is added to the instant and the result is read back as if it
//! were UTC. No timezone database, no daylight saving.

use crate::location::LocationRecord;
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

/// Local hours in [DAY_START_HOUR, DAY_END_HOUR) count as daytime.
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 18;

/// Local wall-clock reading for one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalTime {
    pub hour: u32,
    pub minute: u32,
    pub month: u32,
    pub day_of_year: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: chrono::Weekday,
}

fn serialize_weekday<S: serde::Serializer>(w: &chrono::Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&w.to_string())
}

impl LocalTime {
    /// Hour with minutes as a fraction; seconds are dropped.
    pub fn decimal_hour(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0
    }

    pub fn is_daytime(&self) -> bool {
        (DAY_START_HOUR..DAY_END_HOUR).contains(&self.hour)
    }
}

/// Formatted clock values for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub time: String,
    pub date: String,
    pub offset_label: String,
    pub zone: String,
}

impl ClockReading {
    /// Returned when the location is unknown.
    pub fn unknown() -> Self {
        Self {
            time: "--:--".into(),
            date: "--/--".into(),
            offset_label: "UTC+0".into(),
            zone: "UTC".into(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.time == "--:--"
    }
}

/// Shift an instant by a fixed offset and return the naive local date-time.
pub fn local_datetime(now: DateTime<Utc>, utc_offset_hours: f64) -> NaiveDateTime {
    let offset_secs = (utc_offset_hours * 3600.0).round() as i64;
    (now + Duration::seconds(offset_secs)).naive_utc()
}

pub fn local_time(record: &LocationRecord, now: DateTime<Utc>) -> LocalTime {
    let local = local_datetime(now, record.utc_offset_hours);
    LocalTime {
        hour: local.hour(),
        minute: local.minute(),
        month: local.month(),
        day_of_year: local.ordinal(),
        weekday: local.weekday(),
    }
}

pub fn clock_reading(record: &LocationRecord, now: DateTime<Utc>) -> ClockReading {
    let local = local_datetime(now, record.utc_offset_hours);
    ClockReading {
        time: local.format("%H:%M").to_string(),
        date: local.format("%m/%d (%a)").to_string(),
        offset_label: offset_label(record.utc_offset_hours),
        zone: record.zone.clone(),
    }
}

/// Render an offset as `UTC+9`, `UTC+5.5`, `UTC-5`.
pub fn offset_label(utc_offset_hours: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0 so it prints as "+0".
    let hours = utc_offset_hours + 0.0;
    let sign = if hours >= 0.0 { "+" } else { "" };
    format!("UTC{}{}", sign, hours)
}
