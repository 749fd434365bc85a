//! Solar elevation from latitude, day of year, and local clock time.
//!
//! Coarse dashboard model: Cooper's declination approximation and an hour
//! angle measured from local clock noon. Longitude within the zone and the
//! equation of time are not applied, so local clock noon is treated as solar
//! noon everywhere.

use crate::clock;
use crate::location::LocationRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Maximum declination (Earth's axial tilt) used by the approximation.
pub const AXIAL_TILT: f64 = 23.45;

/// Solar elevation above the horizon, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarElevation {
    pub degrees: f64,
}

impl SolarElevation {
    pub fn radians(&self) -> f64 {
        self.degrees * DEG
    }

    /// At or below the horizon.
    pub fn is_below_horizon(&self) -> bool {
        self.degrees <= 0.0
    }
}

/// Solar declination in degrees for a day of the year (1..=366).
pub fn declination(day_of_year: u32) -> f64 {
    AXIAL_TILT * (2.0 * PI * (284.0 + day_of_year as f64) / 365.0).sin()
}

/// Hour angle in degrees; zero at 12:00 local clock time, 15° per hour.
pub fn hour_angle(local_decimal_hour: f64) -> f64 {
    (local_decimal_hour - 12.0) * 15.0
}

pub fn solar_elevation(latitude: f64, day_of_year: u32, local_decimal_hour: f64) -> SolarElevation {
    let lat_r = latitude * DEG;
    let decl_r = declination(day_of_year) * DEG;
    let ha_r = hour_angle(local_decimal_hour) * DEG;

    let sin_alt = lat_r.sin() * decl_r.sin() + lat_r.cos() * decl_r.cos() * ha_r.cos();
    SolarElevation {
        degrees: sin_alt.clamp(-1.0, 1.0).asin() / DEG,
    }
}

/// Elevation at a catalog location for an instant, using its local clock.
pub fn elevation_at(record: &LocationRecord, now: DateTime<Utc>) -> SolarElevation {
    let local = clock::local_time(record, now);
    solar_elevation(record.latitude, local.day_of_year, local.decimal_hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_declination_extremes() {
        // Around the June solstice the approximation peaks near +23.45°.
        assert_abs_diff_eq!(declination(172), AXIAL_TILT, epsilon = 0.05);
        // Around the December solstice it bottoms out near -23.45°.
        assert_abs_diff_eq!(declination(355), -AXIAL_TILT, epsilon = 0.05);
        // Near the March equinox it crosses zero.
        assert_abs_diff_eq!(declination(81), 0.0, epsilon = 0.5);
    }

    #[test]
    fn test_hour_angle() {
        assert_eq!(hour_angle(12.0), 0.0);
        assert_eq!(hour_angle(18.0), 90.0);
        assert_eq!(hour_angle(6.5), -82.5);
    }

    #[test]
    fn test_noon_elevation_is_complement_of_zenith_distance() {
        // At noon elevation = 90 - |lat - decl|.
        let decl = declination(172);
        let e = solar_elevation(35.6762, 172, 12.0);
        assert_abs_diff_eq!(e.degrees, 90.0 - (35.6762 - decl).abs(), epsilon = 1e-9);
        assert!(e.degrees > 70.0);
    }

    #[test]
    fn test_equator_equinox_noon_overhead() {
        let e = solar_elevation(0.0, 81, 12.0);
        assert!(e.degrees > 89.0);
    }

    #[test]
    fn test_midnight_below_horizon_mid_latitudes() {
        for lat in [-60.0, -33.9, 0.0, 35.7, 52.5, 60.0] {
            for doy in [1, 80, 172, 264, 355] {
                let e = solar_elevation(lat, doy, 0.0);
                assert!(e.is_below_horizon(), "lat {} doy {} -> {}", lat, doy, e.degrees);
            }
        }
    }

    #[test]
    fn test_symmetric_about_noon() {
        let morning = solar_elevation(48.8566, 100, 9.0);
        let afternoon = solar_elevation(48.8566, 100, 15.0);
        assert_abs_diff_eq!(morning.degrees, afternoon.degrees, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_day_midnight_sun() {
        // Inside the Arctic circle at the June solstice the sun stays up.
        let e = solar_elevation(78.2, 172, 0.0);
        assert!(e.degrees > 0.0);
    }
}
