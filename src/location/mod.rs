//! Location subsystem for skyclock.
//!
//! Provides the immutable city catalog and free-text name resolution
//! against its aliases.

pub mod catalog;
pub mod resolver;
pub mod types;

pub use catalog::{Catalog, LocationSummary};
pub use types::{LocationError, LocationKey, LocationRecord, MatchRule, Resolution, DEFAULT_POLLUTION_FACTOR};
