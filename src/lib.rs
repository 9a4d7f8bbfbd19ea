//! # UAP Watch
//!
//! Monthly UAP sightings dashboard with a per-session visitor country
//! tracker, served over HTTP with Axum.
//!
//! ## Features
//!
//! - **Sightings viewer**: month selector, world map and per-country ranking
//! - **Visitor tracker**: IP geolocation with a per-address cache and
//!   per-session visit counts
//! - **Server-side figures**: Plotly figure JSON built and tested in Rust
//!
//! ## Modules
//!
//! - [`sightings`]: CSV dataset loading and month filtering
//! - [`charts`]: Plotly figure builders
//! - [`geo`]: Visitor geolocation client and cache
//! - [`session`]: Per-session visit counters
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uapwatch::sightings::load_dataset;
//! use uapwatch::charts::sightings_ranking;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = load_dataset(Path::new("uap_sightings_monthly.csv"))?;
//!
//!     for month in dataset.months() {
//!         let view = dataset.filter_by_month(&month);
//!         println!("{}: {} sightings", month, view.total_sightings());
//!     }
//!
//!     if let Some(month) = dataset.default_month() {
//!         let view = dataset.filter_by_month(&month);
//!         let figure = sightings_ranking(&month, &view.records);
//!         println!("{} bars", figure.data.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod geo;
pub mod session;
pub mod sightings;

// Re-export top-level types for convenience
pub use sightings::{
    load_dataset, parse_dataset, DatasetError, DatasetResult, MonthView, SightingRecord,
    SightingsDataset,
};

pub use charts::{sightings_map, sightings_ranking, visits_by_country, Figure};

pub use geo::{
    GeoCacheConfig, GeoLookup, GeoLookupError, GeoResolver, IpInfoClient, IpInfoConfig,
    VisitorGeo,
};

pub use session::{CountryVisitCounts, SessionStore, SessionStoreConfig, VisitRow};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, ConfigReport, LoggingConfig, ServerConfig};
