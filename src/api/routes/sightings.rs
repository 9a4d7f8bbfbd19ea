//! Sightings Routes
//!
//! Month selector data, filtered records and the two sightings charts.
//!
//! - GET /api/v1/months - Distinct months and the default selection
//! - GET /api/v1/sightings?month=M - Records for a month
//! - GET /api/v1/charts?month=M - Map and ranking figures for a month
//! - POST /api/v1/dataset/reload - Re-read the CSV

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ChartsResponse, MonthQuery, MonthsResponse, ReloadResponse, SightingsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::charts::{sightings_map, sightings_ranking};
use crate::sightings::SightingsDataset;

/// GET /api/v1/months
pub async fn list_months(State(state): State<Arc<AppState>>) -> Json<MonthsResponse> {
    let dataset = state.dataset().await;

    Json(MonthsResponse {
        months: dataset.months(),
        default: dataset.default_month(),
    })
}

/// GET /api/v1/sightings
///
/// Records for the selected month. A month outside the dataset returns an
/// empty list rather than an error.
pub async fn get_sightings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<SightingsResponse>> {
    let dataset = state.dataset().await;
    let month = selected_month(&dataset, query)?;
    let view = dataset.filter_by_month(&month);

    Ok(Json(SightingsResponse {
        total_sightings: view.total_sightings(),
        records: view.records.iter().map(|r| (*r).clone()).collect(),
        month,
    }))
}

/// GET /api/v1/charts
///
/// Recomputes only the map and ranking panels for a month change.
pub async fn get_charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<ChartsResponse>> {
    let dataset = state.dataset().await;
    let month = selected_month(&dataset, query)?;
    let view = dataset.filter_by_month(&month);

    tracing::debug!(month = %month, records = view.records.len(), "Rendering sightings charts");

    Ok(Json(ChartsResponse {
        map: sightings_map(&month, &view.records),
        ranking: sightings_ranking(&month, &view.records),
        month,
    }))
}

/// POST /api/v1/dataset/reload
///
/// Refused unless `dataset.allow_reload` is set.
pub async fn reload_dataset(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReloadResponse>> {
    if !state.allow_reload {
        return Err(ApiError::Forbidden("dataset reload is disabled".to_string()));
    }

    let dataset = state.reload_dataset().await?;

    tracing::info!(
        path = %state.dataset_path.display(),
        records = dataset.len(),
        "Dataset reloaded"
    );

    Ok(Json(ReloadResponse {
        status: "ok".to_string(),
        records: dataset.len(),
        months: dataset.months(),
    }))
}

/// Month from the query, falling back to the selector default
fn selected_month(dataset: &SightingsDataset, query: MonthQuery) -> ApiResult<String> {
    match query.month {
        Some(month) if month.trim().is_empty() => {
            Err(ApiError::Validation("month must not be empty".to_string()))
        }
        Some(month) => Ok(month),
        None => Ok(dataset.default_month().unwrap_or_default()),
    }
}
