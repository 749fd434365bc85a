//! The location catalog: built-in dataset, validation, and file loading.

use super::types::{LocationError, LocationKey, LocationRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinCity {
    key: &'static str,
    aliases: &'static [&'static str],
    regional: &'static [&'static str],
    lat: f64,
    lon: f64,
    offset: f64,
    zone: &'static str,
    pollution: f64,
    high_albedo: bool,
}

// Order matters: the substring rule scans records top to bottom.
const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity {
        key: "Tokyo",
        aliases: &["東京都", "東京"],
        // Prefectures and their main cities share JST and Tokyo's coordinates.
        regional: &[
            "愛知", "愛知県", "名古屋",
            "大阪", "大阪府",
            "広島", "広島県",
            "福岡", "福岡県",
            "石川", "石川県", "金沢",
            "宮城", "宮城県", "仙台",
            "北海道", "札幌",
            "沖縄", "沖縄県", "那覇",
        ],
        lat: 35.6762, lon: 139.6503, offset: 9.0, zone: "Asia/Tokyo",
        pollution: 0.9, high_albedo: false,
    },
    BuiltinCity {
        key: "New York",
        aliases: &["ニューヨーク"],
        regional: &[],
        lat: 40.7128, lon: -74.0060, offset: -5.0, zone: "America/New_York",
        pollution: 0.85, high_albedo: false,
    },
    BuiltinCity {
        key: "London",
        aliases: &["ロンドン"],
        regional: &[],
        lat: 51.5074, lon: -0.1278, offset: 0.0, zone: "Europe/London",
        pollution: 0.9, high_albedo: false,
    },
    BuiltinCity {
        key: "Paris",
        aliases: &["パリ"],
        regional: &[],
        lat: 48.8566, lon: 2.3522, offset: 1.0, zone: "Europe/Paris",
        pollution: 0.85, high_albedo: false,
    },
    BuiltinCity {
        key: "Berlin",
        aliases: &["ベルリン"],
        regional: &[],
        lat: 52.5200, lon: 13.4050, offset: 1.0, zone: "Europe/Berlin",
        pollution: 0.9, high_albedo: false,
    },
    BuiltinCity {
        key: "Sydney",
        aliases: &["シドニー"],
        regional: &[],
        lat: -33.8688, lon: 151.2093, offset: 11.0, zone: "Australia/Sydney",
        pollution: 0.95, high_albedo: false,
    },
    BuiltinCity {
        key: "Seoul",
        aliases: &["ソウル", "ソウル特別市"],
        regional: &[],
        lat: 37.5665, lon: 126.9780, offset: 9.0, zone: "Asia/Seoul",
        pollution: 0.8, high_albedo: false,
    },
    BuiltinCity {
        key: "Beijing",
        aliases: &["北京", "北京市"],
        regional: &[],
        lat: 39.9042, lon: 116.4074, offset: 8.0, zone: "Asia/Shanghai",
        pollution: 0.7, high_albedo: false,
    },
    BuiltinCity {
        key: "Mumbai",
        aliases: &["ムンバイ"],
        regional: &[],
        lat: 19.0760, lon: 72.8777, offset: 5.5, zone: "Asia/Kolkata",
        pollution: 0.75, high_albedo: false,
    },
    BuiltinCity {
        key: "Sao Paulo",
        aliases: &["サンパウロ"],
        regional: &[],
        lat: -23.5558, lon: -46.6396, offset: -3.0, zone: "America/Sao_Paulo",
        pollution: 0.8, high_albedo: false,
    },
    BuiltinCity {
        key: "Dubai",
        aliases: &["ドバイ"],
        regional: &[],
        lat: 25.2048, lon: 55.2708, offset: 4.0, zone: "Asia/Dubai",
        pollution: 0.95, high_albedo: true,
    },
    BuiltinCity {
        key: "Cairo",
        aliases: &["カイロ"],
        regional: &[],
        lat: 30.0444, lon: 31.2357, offset: 2.0, zone: "Africa/Cairo",
        pollution: 0.9, high_albedo: true,
    },
    BuiltinCity {
        key: "Lagos",
        aliases: &["ラゴス"],
        regional: &[],
        lat: 6.5244, lon: 3.3792, offset: 1.0, zone: "Africa/Lagos",
        pollution: 0.85, high_albedo: false,
    },
    BuiltinCity {
        key: "Mexico City",
        aliases: &["メキシコシティ"],
        regional: &[],
        lat: 19.4326, lon: -99.1332, offset: -6.0, zone: "America/Mexico_City",
        pollution: 0.8, high_albedo: false,
    },
    BuiltinCity {
        key: "Bangkok",
        aliases: &["バンコク"],
        regional: &[],
        lat: 13.7563, lon: 100.5018, offset: 7.0, zone: "Asia/Bangkok",
        pollution: 0.8, high_albedo: false,
    },
];

fn builtin_to_record(city: &BuiltinCity) -> LocationRecord {
    LocationRecord {
        key: LocationKey::new(city.key),
        aliases: city.aliases.iter().map(|a| a.to_string()).collect(),
        regional_aliases: city.regional.iter().map(|a| a.to_string()).collect(),
        latitude: city.lat,
        longitude: city.lon,
        utc_offset_hours: city.offset,
        zone: city.zone.to_string(),
        pollution_factor: city.pollution,
        high_albedo: city.high_albedo,
    }
}

// ─── Catalog ────────────────────────────────────────────────────

/// Scan tiers for the substring rule. All localized names are tried before
/// any regional alias, and canonical keys come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum AliasTier {
    Localized,
    Regional,
    Canonical,
}

/// An alias as seen by the resolver, in scan order.
#[derive(Debug, Clone)]
pub(super) struct AliasEntry {
    pub alias: String,
    pub lowered: String,
    pub index: usize,
    pub tier: AliasTier,
}

impl AliasEntry {
    fn new(alias: &str, index: usize, tier: AliasTier) -> Self {
        Self {
            alias: alias.to_string(),
            lowered: alias.to_lowercase(),
            index,
            tier,
        }
    }
}

/// The immutable, ordered location table.
///
/// Built once at startup and shared by reference; nothing mutates it after
/// construction, so it can be read from any number of threads.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<LocationRecord>,
    pub(super) aliases: Vec<AliasEntry>,
    pub(super) by_key: HashMap<String, usize>,
}

impl Catalog {
    /// The built-in fifteen-city catalog.
    pub fn builtin() -> Self {
        let records = BUILTIN_CITIES.iter().map(builtin_to_record).collect();
        // The built-in table is covered by tests; a failure here is a programming error.
        match Self::from_records(records) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in catalog is invalid: {}", e),
        }
    }

    /// Build a catalog from records, keeping their order.
    pub fn from_records(records: Vec<LocationRecord>) -> Result<Self, LocationError> {
        if records.is_empty() {
            return Err(LocationError::InvalidCatalog("catalog has no entries".into()));
        }

        let mut by_key = HashMap::with_capacity(records.len());
        let mut alias_owner: HashMap<&str, &str> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            validate_record(record)?;
            let key = record.key.as_str();
            if by_key.insert(key.to_string(), index).is_some() {
                return Err(LocationError::InvalidCatalog(format!("duplicate key '{}'", key)));
            }

            for alias in record.aliases.iter().chain(&record.regional_aliases) {
                if alias.trim().is_empty() {
                    return Err(LocationError::InvalidCatalog(format!("empty alias on '{}'", key)));
                }
                if let Some(owner) = alias_owner.insert(alias.as_str(), key) {
                    if owner != key {
                        return Err(LocationError::InvalidCatalog(format!(
                            "alias '{}' registered to both '{}' and '{}'",
                            alias, owner, key
                        )));
                    }
                }
            }
        }

        // Exact aliases are matched before keys, so an alias naming another
        // entry's key would shadow that entry.
        for (alias, owner) in &alias_owner {
            if by_key.contains_key(*alias) && alias != owner {
                return Err(shadowed(alias, owner));
            }
        }

        let aliases = scan_order(&records);
        Ok(Self { records, aliases, by_key })
    }

    /// Load a catalog from a JSON array of records.
    pub fn load_from(path: &Path) -> Result<Self, LocationError> {
        let data = fs::read_to_string(path).map_err(|source| LocationError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<LocationRecord> =
            serde_json::from_str(&data).map_err(|source| LocationError::CatalogParse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_records(records)
    }

    pub fn get(&self, key: &LocationKey) -> Option<&LocationRecord> {
        self.by_key.get(key.as_str()).map(|&i| &self.records[i])
    }

    pub(super) fn record_at(&self, index: usize) -> &LocationRecord {
        &self.records[index]
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &LocationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summaries for list endpoints.
    pub fn summaries(&self) -> Vec<LocationSummary> {
        self.records.iter().map(LocationSummary::from).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn shadowed(alias: &str, key: &str) -> LocationError {
    LocationError::InvalidCatalog(format!(
        "alias '{}' on '{}' shadows the key of another entry",
        alias, key
    ))
}

/// Every localized alias in record order, then every regional alias, then
/// the keys. A name listed twice on one record keeps its first slot.
fn scan_order(records: &[LocationRecord]) -> Vec<AliasEntry> {
    let mut seen: HashSet<(usize, &str)> = HashSet::new();
    let mut entries = Vec::new();

    for (index, record) in records.iter().enumerate() {
        for alias in &record.aliases {
            if seen.insert((index, alias.as_str())) {
                entries.push(AliasEntry::new(alias, index, AliasTier::Localized));
            }
        }
    }
    for (index, record) in records.iter().enumerate() {
        for alias in &record.regional_aliases {
            if seen.insert((index, alias.as_str())) {
                entries.push(AliasEntry::new(alias, index, AliasTier::Regional));
            }
        }
    }
    for (index, record) in records.iter().enumerate() {
        if seen.insert((index, record.key.as_str())) {
            entries.push(AliasEntry::new(record.key.as_str(), index, AliasTier::Canonical));
        }
    }
    entries
}

fn validate_record(record: &LocationRecord) -> Result<(), LocationError> {
    let key = record.key.as_str();
    let invalid = |what: String| Err(LocationError::InvalidCatalog(format!("'{}': {}", key, what)));

    if key.trim().is_empty() {
        return Err(LocationError::InvalidCatalog("empty location key".into()));
    }
    if !(-90.0..=90.0).contains(&record.latitude) {
        return invalid(format!("latitude {} outside -90..90", record.latitude));
    }
    if !(-180.0..=180.0).contains(&record.longitude) {
        return invalid(format!("longitude {} outside -180..180", record.longitude));
    }
    let offset = record.utc_offset_hours;
    if !(-12.0..=14.0).contains(&offset) || (offset * 4.0).fract() != 0.0 {
        return invalid(format!("UTC offset {} is not a quarter hour in -12..14", offset));
    }
    if !(record.pollution_factor > 0.0 && record.pollution_factor <= 1.0) {
        return invalid(format!("pollution factor {} outside (0, 1]", record.pollution_factor));
    }
    Ok(())
}

/// A catalog entry for the public list API.
#[derive(Debug, Clone, Serialize)]
pub struct LocationSummary {
    pub key: LocationKey,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regional_aliases: Vec<String>,
    pub lat: f64,
    pub lon: f64,
    pub utc_offset_hours: f64,
    pub zone: String,
}

impl From<&LocationRecord> for LocationSummary {
    fn from(record: &LocationRecord) -> Self {
        Self {
            key: record.key.clone(),
            aliases: record.aliases.clone(),
            regional_aliases: record.regional_aliases.clone(),
            lat: record.latitude,
            lon: record.longitude,
            utc_offset_hours: record.utc_offset_hours,
            zone: record.zone.clone(),
        }
    }
}
