//! skyclock — local time, day/night, sunrise/sunset and UV estimates for a
//! small fixed catalog of named cities.
//!
//! All computations are pure functions over an immutable [`location::Catalog`]
//! and a caller-supplied instant.

pub mod clock;
pub mod config;
pub mod location;
pub mod server;
pub mod sky;
pub mod solar;
pub mod sun_times;
pub mod telemetry;
pub mod uv;

pub use location::{Catalog, LocationError, LocationKey, LocationRecord};
pub use sky::{SkyClock, SkyReport};
