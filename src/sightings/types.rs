//! Core dataset types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One row of the dataset: sightings in a country for a given month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    /// Month label, e.g. "2024-01"
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Aggregated sighting count
    #[serde(rename = "Sightings")]
    pub sightings: u64,
}

impl SightingRecord {
    /// Create a new record
    pub fn new(
        month: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
        sightings: u64,
    ) -> Self {
        Self {
            month: month.into(),
            country: country.into(),
            latitude,
            longitude,
            sightings,
        }
    }

    /// Whether the coordinates fall inside the valid WGS84 ranges
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The full, immutable set of sighting records
///
/// Records keep their file order. A reload builds a new dataset rather
/// than mutating this one.
#[derive(Debug, Clone, Default)]
pub struct SightingsDataset {
    records: Vec<SightingRecord>,
    source: Option<PathBuf>,
}

impl SightingsDataset {
    /// Build a dataset from in-memory records
    pub fn new(records: Vec<SightingRecord>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    /// Attach the file this dataset was read from
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn records(&self) -> &[SightingRecord] {
        &self.records
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
