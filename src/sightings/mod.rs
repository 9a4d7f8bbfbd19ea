//! Sightings Dataset
//!
//! Monthly UAP sighting counts aggregated by country, loaded from CSV.
//!
//! ## Components
//!
//! - **types**: `SightingRecord` and the immutable `SightingsDataset`
//! - **loader**: CSV parsing and coordinate validation
//! - **filter**: month listing and exact month filtering

pub mod error;
pub mod filter;
pub mod loader;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use filter::MonthView;
pub use loader::{load_dataset, parse_dataset};
pub use types::{SightingRecord, SightingsDataset};
