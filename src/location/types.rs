//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Canonical identifier of a catalog entry (e.g. "Tokyo", "New York").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub key: LocationKey,
    /// Localized names for this location.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Sub-national regions that borrow this location's coordinates and offset.
    #[serde(default)]
    pub regional_aliases: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Fixed offset from UTC in hours. Never adjusted for daylight saving.
    pub utc_offset_hours: f64,
    /// Display label for the zone; not used for any conversion.
    #[serde(default = "default_zone")]
    pub zone: String,
    /// Atmospheric transparency multiplier used by the UV estimator.
    #[serde(default = "default_pollution")]
    pub pollution_factor: f64,
    /// Bright desert ground that reflects extra UV.
    #[serde(default)]
    pub high_albedo: bool,
}

pub const DEFAULT_POLLUTION_FACTOR: f64 = 0.9;

fn default_zone() -> String {
    "UTC".into()
}

fn default_pollution() -> f64 {
    DEFAULT_POLLUTION_FACTOR
}

/// Which matching rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactAlias,
    ExactKey,
    Substring,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactAlias => write!(f, "exact alias"),
            Self::ExactKey => write!(f, "exact key"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

/// A successful resolution: the record plus the rule that matched.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub record: &'a LocationRecord,
    pub rule: MatchRule,
}

/// Location errors.
///
/// `Unresolved` is the only per-call condition; the rest can only happen
/// while building a catalog.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location not found: '{0}'")]
    Unresolved(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Cannot read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
