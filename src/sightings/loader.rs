//! CSV Loader
//!
//! Reads the monthly sightings CSV. Expected header:
//!
//! ```text
//! Month,Country,Latitude,Longitude,Sightings
//! ```
//!
//! Unlike a bulk import, a load is all-or-nothing: the first bad row fails
//! the whole load with its line number.

use super::error::{DatasetError, DatasetResult};
use super::types::{SightingRecord, SightingsDataset};
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["Month", "Country", "Latitude", "Longitude", "Sightings"];

/// Load the dataset from a CSV file
pub fn load_dataset(path: &Path) -> DatasetResult<SightingsDataset> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = parse_dataset(file)?.with_source(path);

    tracing::info!(
        path = %path.display(),
        records = dataset.len(),
        "Loaded sightings dataset"
    );

    Ok(dataset)
}

/// Parse a dataset from any CSV reader (useful for testing)
pub fn parse_dataset<R: Read>(reader: R) -> DatasetResult<SightingsDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Header(e.to_string()))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::Header(format!("missing column '{}'", column)));
        }
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(|e| DatasetError::Row {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;

        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let record: SightingRecord =
            row.deserialize(Some(&headers))
                .map_err(|e| DatasetError::Row {
                    line,
                    message: deserialize_message(&e),
                })?;

        if !record.has_valid_coordinates() {
            return Err(DatasetError::InvalidCoordinate {
                line,
                latitude: record.latitude,
                longitude: record.longitude,
            });
        }

        records.push(record);
    }

    Ok(SightingsDataset::new(records))
}

/// csv prefixes deserialize errors with position info we already report
fn deserialize_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    }
}
