//! `SkyClock` — the public API for skyclock.
//!
//! Every call takes a free-text location name, resolves it against the
//! catalog, and returns a value. None of them fail: an unknown name yields a
//! documented default so a refreshing dashboard never breaks on bad input.

use crate::clock::{self, ClockReading};
use crate::location::{Catalog, LocationError, LocationKey, LocationRecord, LocationSummary};
use crate::solar::{self, SolarElevation};
use crate::sun_times::{self, SunriseSunset};
use crate::uv::{self, UvBreakdown, DEFAULT_UV_INDEX};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Façade over a borrowed catalog. Cheap to create per request.
#[derive(Debug, Clone, Copy)]
pub struct SkyClock<'a> {
    catalog: &'a Catalog,
}

/// Everything the dashboard shows for one location at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SkyReport {
    pub query: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSummary>,
    pub instant: DateTime<Utc>,
    pub clock: ClockReading,
    pub daytime: bool,
    pub sun: SunriseSunset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_elevation: Option<f64>,
    pub uv_index: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_breakdown: Option<UvBreakdown>,
}

impl<'a> SkyClock<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn lookup(&self, name: &str) -> Option<&'a LocationRecord> {
        self.catalog.resolve_with_rule(name).ok().map(|r| r.record)
    }

    pub fn resolve_location(&self, name: &str) -> Result<LocationKey, LocationError> {
        self.catalog.resolve(name)
    }

    /// Local clock; `--:--` / `--/--` / `UTC+0` when unresolved.
    pub fn local_time(&self, name: &str, now: DateTime<Utc>) -> ClockReading {
        self.lookup(name)
            .map_or_else(ClockReading::unknown, |r| clock::clock_reading(r, now))
    }

    /// True for local hours 6..18; true when unresolved.
    pub fn is_daytime(&self, name: &str, now: DateTime<Utc>) -> bool {
        self.lookup(name)
            .map_or(true, |r| clock::local_time(r, now).is_daytime())
    }

    /// Estimate for the location's current local month; 06:00 / 18:00 when unresolved.
    pub fn sunrise_sunset(&self, name: &str, now: DateTime<Utc>) -> SunriseSunset {
        self.lookup(name).map_or_else(SunriseSunset::default, |r| {
            let month = clock::local_time(r, now).month;
            sun_times::estimate_sunrise_sunset(r.latitude, month)
        })
    }

    /// UV index in 0..=10; 5 when unresolved.
    pub fn uv_index(&self, name: &str, now: DateTime<Utc>, cloud_coverage_percent: Option<f64>) -> u8 {
        self.lookup(name).map_or(DEFAULT_UV_INDEX, |r| {
            uv::estimate_uv_index(r, now, cloud_coverage_percent)
        })
    }

    pub fn uv_breakdown(
        &self,
        name: &str,
        now: DateTime<Utc>,
        cloud_coverage_percent: Option<f64>,
    ) -> Option<UvBreakdown> {
        self.lookup(name)
            .map(|r| uv::breakdown(r, now, cloud_coverage_percent))
    }

    pub fn solar_elevation(&self, name: &str, now: DateTime<Utc>) -> Option<SolarElevation> {
        self.lookup(name).map(|r| solar::elevation_at(r, now))
    }

    /// All values in one pass; the name is resolved once.
    pub fn report(
        &self,
        name: &str,
        now: DateTime<Utc>,
        cloud_coverage_percent: Option<f64>,
        explain: bool,
    ) -> SkyReport {
        match self.lookup(name) {
            Some(record) => {
                let local = clock::local_time(record, now);
                let breakdown = uv::breakdown(record, now, cloud_coverage_percent);
                SkyReport {
                    query: name.to_string(),
                    resolved: true,
                    location: Some(LocationSummary::from(record)),
                    instant: now,
                    clock: clock::clock_reading(record, now),
                    daytime: local.is_daytime(),
                    sun: sun_times::estimate_sunrise_sunset(record.latitude, local.month),
                    solar_elevation: Some(breakdown.solar_elevation),
                    uv_index: breakdown.index,
                    uv_breakdown: explain.then_some(breakdown),
                }
            }
            None => SkyReport {
                query: name.to_string(),
                resolved: false,
                location: None,
                instant: now,
                clock: ClockReading::unknown(),
                daytime: true,
                sun: SunriseSunset::default(),
                solar_elevation: None,
                uv_index: DEFAULT_UV_INDEX,
                uv_breakdown: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 21, h, m, 0).unwrap()
    }

    #[test]
    fn test_unresolved_defaults() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        let now = at(12, 0);
        let name = "Nonexistent Place";

        assert!(sky.resolve_location(name).is_err());
        assert_eq!(sky.local_time(name, now), ClockReading::unknown());
        assert!(sky.is_daytime(name, now));
        assert_eq!(sky.sunrise_sunset(name, now), SunriseSunset::default());
        assert_eq!(sky.uv_index(name, now, Some(10.0)), 5);
        assert!(sky.uv_breakdown(name, now, None).is_none());
        assert!(sky.solar_elevation(name, now).is_none());
    }

    #[test]
    fn test_aliases_give_same_results() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        let now = at(3, 0);
        assert_eq!(sky.local_time("東京", now), sky.local_time("Tokyo", now));
        assert_eq!(sky.uv_index("大阪府", now, None), sky.uv_index("Tokyo", now, None));
        assert_eq!(sky.local_time("Tokyo", now).time, "12:00");
    }

    #[test]
    fn test_daytime_follows_local_clock() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        // 12:00 UTC: 21:00 in Tokyo, 07:00 in New York.
        assert!(!sky.is_daytime("Tokyo", at(12, 0)));
        assert!(sky.is_daytime("New York", at(12, 0)));
    }

    #[test]
    fn test_sunrise_uses_local_month() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        // 2025-02-28 20:00 UTC is already March 1st in Tokyo.
        let end_of_feb = Utc.with_ymd_and_hms(2025, 2, 28, 20, 0, 0).unwrap();
        let tokyo = sky.sunrise_sunset("Tokyo", end_of_feb);
        let march = sun_times::estimate_sunrise_sunset(35.6762, 3);
        assert_eq!(tokyo, march);
        // New York is still in February.
        let ny = sky.sunrise_sunset("New York", end_of_feb);
        assert_eq!(ny, sun_times::estimate_sunrise_sunset(40.7128, 2));
    }

    #[test]
    fn test_report_matches_individual_calls() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        let now = at(9, 45);
        for record in catalog.iter() {
            let name = record.key.as_str();
            let report = sky.report(name, now, Some(40.0), true);
            assert!(report.resolved);
            assert_eq!(report.clock, sky.local_time(name, now));
            assert_eq!(report.daytime, sky.is_daytime(name, now));
            assert_eq!(report.sun, sky.sunrise_sunset(name, now));
            assert_eq!(report.uv_index, sky.uv_index(name, now, Some(40.0)));
            assert_eq!(report.uv_breakdown.map(|b| b.index), Some(report.uv_index));
        }
    }

    #[test]
    fn test_report_unresolved_serializes_without_location() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        let report = sky.report("???", at(0, 0), None, true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resolved"], false);
        assert_eq!(json["uv_index"], 5);
        assert_eq!(json["clock"]["time"], "--:--");
        assert!(json.get("location").is_none());
        assert!(json.get("uv_breakdown").is_none());
    }

    #[test]
    fn test_local_time_periodic() {
        let catalog = Catalog::builtin();
        let sky = SkyClock::new(&catalog);
        let now = at(17, 23);
        let later = now + Duration::hours(24);
        assert_eq!(sky.local_time("Mumbai", now).time, sky.local_time("Mumbai", later).time);
    }
}
