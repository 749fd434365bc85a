//! UV index estimate on a 0..=10 scale.
//!
//! Multiplicative model: a latitude-band base value scaled by solar elevation
//! and by ozone, cloud, atmosphere, and ground-reflection factors. Fully
//! deterministic for a given location, instant, and cloud cover.

use crate::clock;
use crate::location::LocationRecord;
use crate::solar::{self, SolarElevation};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Returned when the location is unknown.
pub const DEFAULT_UV_INDEX: u8 = 5;
pub const MAX_UV_INDEX: u8 = 10;

/// Cloud factor used when no cloud cover is known (light cloud assumed).
const DEFAULT_CLOUD_FACTOR: f64 = 0.85;
const MIN_CLOUD_FACTOR: f64 = 0.3;
const CLOUD_ATTENUATION: f64 = 0.7;

const SNOW_REFLECTION: f64 = 1.1;
const DESERT_REFLECTION: f64 = 1.05;
const SNOW_LATITUDE: f64 = 40.0;

/// Every factor that went into one estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvBreakdown {
    pub solar_elevation: f64,
    pub base_uv: f64,
    pub elevation_factor: f64,
    pub ozone_factor: f64,
    pub cloud_factor: f64,
    pub atmosphere_factor: f64,
    pub reflection_factor: f64,
    pub raw: f64,
    pub index: u8,
}

impl UvBreakdown {
    fn below_horizon(elevation: SolarElevation) -> Self {
        Self {
            solar_elevation: elevation.degrees,
            base_uv: 0.0,
            elevation_factor: 0.0,
            ozone_factor: 1.0,
            cloud_factor: 1.0,
            atmosphere_factor: 1.0,
            reflection_factor: 1.0,
            raw: 0.0,
            index: 0,
        }
    }
}

/// Clear-sky peak by absolute latitude band.
pub fn base_uv(latitude: f64) -> f64 {
    let abs_lat = latitude.abs();
    if abs_lat > 60.0 {
        6.0
    } else if abs_lat > 45.0 {
        8.0
    } else if abs_lat > 30.0 {
        10.0
    } else {
        12.0
    }
}

/// Ozone column multiplier; larger means more absorption.
///
/// Band values run from 0.95 in the tropics to 1.1 in polar regions, then
/// ±5% for spring depletion (×1.05) and autumn recovery (×0.95), with the
/// seasons mirrored south of the equator.
pub fn ozone_factor(latitude: f64, month: u32) -> f64 {
    let abs_lat = latitude.abs();
    let band = if abs_lat < 20.0 {
        0.95
    } else if abs_lat < 40.0 {
        1.0
    } else if abs_lat < 60.0 {
        1.05
    } else {
        1.1
    };

    let (spring, autumn) = if latitude > 0.0 {
        (3..=5, 9..=11)
    } else {
        (9..=11, 3..=5)
    };

    if spring.contains(&month) {
        band * 1.05
    } else if autumn.contains(&month) {
        band * 0.95
    } else {
        band
    }
}

/// Cloud transmission for a cover percentage. Out-of-range values are
/// clamped to 0..=100; unknown or non-finite cover uses the default.
pub fn cloud_factor(cloud_coverage_percent: Option<f64>) -> f64 {
    match cloud_coverage_percent.filter(|c| c.is_finite()) {
        Some(cloud) => {
            let cloud = cloud.clamp(0.0, 100.0);
            (1.0 - (cloud / 100.0) * CLOUD_ATTENUATION).max(MIN_CLOUD_FACTOR)
        }
        None => DEFAULT_CLOUD_FACTOR,
    }
}

fn is_winter(latitude: f64, month: u32) -> bool {
    if latitude > 0.0 {
        matches!(month, 12 | 1 | 2)
    } else {
        (6..=8).contains(&month)
    }
}

/// Ground reflection: bright desert, or winter snow at high latitude.
pub fn reflection_factor(record: &LocationRecord, month: u32) -> f64 {
    if record.high_albedo {
        DESERT_REFLECTION
    } else if record.latitude.abs() > SNOW_LATITUDE && is_winter(record.latitude, month) {
        SNOW_REFLECTION
    } else {
        1.0
    }
}

/// Run the full pipeline for a location at an instant.
pub fn breakdown(
    record: &LocationRecord,
    now: DateTime<Utc>,
    cloud_coverage_percent: Option<f64>,
) -> UvBreakdown {
    let local = clock::local_time(record, now);
    let elevation = solar::solar_elevation(record.latitude, local.day_of_year, local.decimal_hour());
    if elevation.is_below_horizon() {
        return UvBreakdown::below_horizon(elevation);
    }

    let base = base_uv(record.latitude);
    let elevation_factor = elevation.radians().sin();
    let ozone = ozone_factor(record.latitude, local.month);
    let cloud = cloud_factor(cloud_coverage_percent);
    let atmosphere = record.pollution_factor;
    let reflection = reflection_factor(record, local.month);

    let raw = base * elevation_factor * (1.0 / ozone) * cloud * atmosphere * reflection;
    UvBreakdown {
        solar_elevation: elevation.degrees,
        base_uv: base,
        elevation_factor,
        ozone_factor: ozone,
        cloud_factor: cloud,
        atmosphere_factor: atmosphere,
        reflection_factor: reflection,
        raw,
        index: to_index(raw),
    }
}

pub fn estimate_uv_index(
    record: &LocationRecord,
    now: DateTime<Utc>,
    cloud_coverage_percent: Option<f64>,
) -> u8 {
    breakdown(record, now, cloud_coverage_percent).index
}

fn to_index(raw: f64) -> u8 {
    raw.clamp(0.0, MAX_UV_INDEX as f64).round() as u8
}
