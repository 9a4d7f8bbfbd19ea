//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::Figure;
use crate::geo::VisitorGeo;
use crate::session::VisitRow;
use crate::sightings::SightingRecord;

// ============================================
// SIGHTINGS DTOs
// ============================================

/// `?month=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// Selected month; defaults to the earliest month when omitted
    #[serde(default)]
    pub month: Option<String>,
}

/// Month selector options
#[derive(Debug, Serialize)]
pub struct MonthsResponse {
    pub months: Vec<String>,
    /// Initially selected month, absent for an empty dataset
    pub default: Option<String>,
}

/// Records for one month
#[derive(Debug, Serialize)]
pub struct SightingsResponse {
    pub month: String,
    pub total_sightings: u64,
    pub records: Vec<SightingRecord>,
}

/// Both sightings charts for one month
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub month: String,
    pub map: Figure,
    pub ranking: Figure,
}

/// Embedded video panel
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub title: String,
    pub url: String,
    pub embed_url: String,
}

/// Outcome of a dataset reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: String,
    pub records: usize,
    pub months: Vec<String>,
}

// ============================================
// VISITOR DTOs
// ============================================

/// Response to a page-load visit
#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub visitor: VisitorGeo,
    /// Set when the lookup failed and `visitor` is the placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
    pub session: SessionDto,
    pub chart: Figure,
}

/// A session's visit table
#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub started_at: Option<DateTime<Utc>>,
    pub total_visits: u64,
    pub rows: Vec<VisitRow>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub dataset_records: usize,
    pub months: usize,
    pub active_sessions: usize,
    pub geo_backend: String,
    pub geo_cached: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
