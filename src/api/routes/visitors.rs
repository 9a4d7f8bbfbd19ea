//! Visitor Routes
//!
//! - POST /api/v1/visit - Geolocate the visitor, count the visit, return the panel
//! - GET /api/v1/visits - The session's visit table without counting a visit

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{SessionDto, VisitResponse};
use crate::api::state::AppState;
use crate::api::visitor::{session_cookie, VisitorContext};
use crate::charts::visits_by_country;
use crate::geo::VisitorGeo;

/// POST /api/v1/visit
///
/// Called once per page load. A failed lookup falls back to the
/// "Unavailable"/"Unknown" placeholder and is counted under "Unknown".
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    visitor: VisitorContext,
) -> (HeaderMap, Json<VisitResponse>) {
    let (geo, lookup_error) = match state.geo.resolve(visitor.ip).await {
        Ok(geo) => (geo, None),
        Err(e) => {
            tracing::warn!(
                ip = ?visitor.ip,
                kind = e.kind(),
                error = %e,
                "Geolocation lookup failed, using placeholder"
            );
            (VisitorGeo::unavailable(), Some(e.to_string()))
        }
    };

    let outcome = state
        .sessions
        .record_visit(visitor.session_id.as_deref(), &geo.country)
        .await;

    // Re-sent on every visit so the browser's expiry tracks the server's idle timer
    let mut headers = HeaderMap::new();
    let max_age = state.sessions.config().idle_timeout.as_secs();
    if let Some(cookie) = session_cookie(
        &state.cookie_name,
        &outcome.snapshot.session_id,
        max_age,
        state.cookie_secure,
    ) {
        headers.insert(header::SET_COOKIE, cookie);
    }

    let snapshot = outcome.snapshot;

    tracing::info!(
        session_id = %snapshot.session_id,
        new_session = outcome.created,
        country = %geo.country,
        visits = outcome.country_visits,
        "Visit counted"
    );

    let body = VisitResponse {
        chart: visits_by_country(&snapshot.rows),
        visitor: geo,
        lookup_error,
        session: SessionDto {
            started_at: Some(snapshot.started_at),
            total_visits: snapshot.total_visits,
            rows: snapshot.rows,
        },
    };

    (headers, Json(body))
}

/// GET /api/v1/visits
///
/// Raw visit table for the caller's session; empty without a live session.
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
    visitor: VisitorContext,
) -> Json<SessionDto> {
    let snapshot = match visitor.session_id {
        Some(id) => state.sessions.snapshot(&id).await,
        None => None,
    };

    Json(match snapshot {
        Some(s) => SessionDto {
            started_at: Some(s.started_at),
            total_visits: s.total_visits,
            rows: s.rows,
        },
        None => SessionDto {
            started_at: None,
            total_visits: 0,
            rows: Vec::new(),
        },
    })
}
