//! Month Filtering
//!
//! Month listing and exact-match filtering over a loaded dataset.

use super::types::{SightingRecord, SightingsDataset};
use std::collections::BTreeSet;

/// The records for one selected month
#[derive(Debug, Clone)]
pub struct MonthView<'a> {
    pub month: String,
    pub records: Vec<&'a SightingRecord>,
}

impl MonthView<'_> {
    /// Sum of sightings across all countries for this month
    pub fn total_sightings(&self) -> u64 {
        self.records.iter().map(|r| r.sightings).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SightingsDataset {
    /// Distinct months, sorted ascending by string order
    pub fn months(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|r| r.month.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// The month the selector starts on (the earliest one)
    pub fn default_month(&self) -> Option<String> {
        self.records().iter().map(|r| &r.month).min().cloned()
    }

    /// Records whose month equals `month` exactly
    ///
    /// A month that is not in the dataset yields an empty view.
    pub fn filter_by_month(&self, month: &str) -> MonthView<'_> {
        let records = self
            .records()
            .iter()
            .filter(|r| r.month == month)
            .collect();

        MonthView {
            month: month.to_string(),
            records,
        }
    }

    /// Whether `month` is one of the dataset's months
    pub fn has_month(&self, month: &str) -> bool {
        self.records().iter().any(|r| r.month == month)
    }
}
