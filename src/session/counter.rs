//! Per-session visit counts keyed by visitor country

use serde::Serialize;
use std::collections::HashMap;

/// Visits per country for a single session
#[derive(Debug, Clone, Default)]
pub struct CountryVisitCounts {
    counts: HashMap<String, u64>,
}

/// One row of the raw visit table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRow {
    pub country: String,
    pub visits: u64,
}

impl CountryVisitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one visit from `country`, returning its new total
    pub fn record(&mut self, country: &str) -> u64 {
        let count = self.counts.entry(country.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, country: &str) -> Option<u64> {
        self.counts.get(country).copied()
    }

    /// Total visits across all countries
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Rows ordered by visits descending, then country name
    pub fn ranked(&self) -> Vec<VisitRow> {
        let mut rows: Vec<VisitRow> = self
            .counts
            .iter()
            .map(|(country, visits)| VisitRow {
                country: country.clone(),
                visits: *visits,
            })
            .collect();

        rows.sort_by(|a, b| b.visits.cmp(&a.visits).then_with(|| a.country.cmp(&b.country)));
        rows
    }
}
