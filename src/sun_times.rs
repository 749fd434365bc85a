//! Sunrise and sunset estimate.
//!
//! A seasonal swing of up to two hours around 06:00 / 18:00, scaled by
//! latitude. Not a sunrise equation; good enough for a dashboard card.

use serde::Serialize;

const BASE_SUNRISE: f64 = 6.0;
const BASE_SUNSET: f64 = 18.0;
const MAX_SWING_HOURS: f64 = 2.0;

/// Estimated sunrise and sunset as "HH:MM" local clock strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunriseSunset {
    pub sunrise: String,
    pub sunset: String,
}

impl Default for SunriseSunset {
    fn default() -> Self {
        Self {
            sunrise: format_hours(BASE_SUNRISE),
            sunset: format_hours(BASE_SUNSET),
        }
    }
}

/// Signed swing in hours: positive lengthens the day.
///
/// March through September counts as the northern summer half; the sign
/// flips for the southern hemisphere and for October through February.
/// The equator itself (latitude 0) falls on the southern branch, where the
/// swing is zero anyway.
pub fn seasonal_swing(latitude: f64, month: u32) -> f64 {
    let magnitude = latitude.abs() / 90.0 * MAX_SWING_HOURS;
    let northern_summer_half = (3..=9).contains(&month);
    match (northern_summer_half, latitude > 0.0) {
        (true, true) | (false, false) => magnitude,
        _ => -magnitude,
    }
}

pub fn estimate_sunrise_sunset(latitude: f64, month: u32) -> SunriseSunset {
    let swing = seasonal_swing(latitude, month);
    let sunrise = (BASE_SUNRISE - swing).clamp(4.0, 8.0);
    let sunset = (BASE_SUNSET + swing).clamp(16.0, 20.0);
    SunriseSunset {
        sunrise: format_hours(sunrise),
        sunset: format_hours(sunset),
    }
}

/// Decimal hours to "HH:MM", truncating partial minutes.
pub fn format_hours(hours: f64) -> String {
    let h = hours.floor();
    let m = ((hours - h) * 60.0).floor();
    format!("{:02}:{:02}", h as u32, m as u32)
}
