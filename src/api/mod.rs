//! UAP Watch HTTP API
//!
//! Dashboard page and JSON API, built with Axum. Each UI event maps to one
//! endpoint so only the affected panels are recomputed.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard
//!
//! ## Sightings
//! - `GET /api/v1/months` - Month selector options
//! - `GET /api/v1/sightings?month=M` - Records for a month
//! - `GET /api/v1/charts?month=M` - Map and ranking figures
//! - `GET /api/v1/videos` - Embedded videos
//! - `POST /api/v1/dataset/reload` - Re-read the CSV (when `dataset.allow_reload`)
//!
//! ## Visitors
//! - `POST /api/v1/visit` - Count a page-load visit
//! - `GET /api/v1/visits` - Session visit table
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use uapwatch::api::{serve, AppState};
//! use uapwatch::config::Config;
//! use uapwatch::geo::{GeoResolver, IpInfoClient};
//! use uapwatch::session::SessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let dataset = uapwatch::sightings::load_dataset(&config.dataset.path)?;
//!     let client = Arc::new(IpInfoClient::new(config.geo.client_config())?);
//!     let geo = Arc::new(GeoResolver::new(client, config.geo.cache_config()));
//!     let sessions = Arc::new(SessionStore::new(config.session.store_config()));
//!
//!     let state = AppState::new(dataset, geo, sessions, &config);
//!     serve(state, &config.server).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
pub mod visitor;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Sightings routes
        .route("/months", get(routes::sightings::list_months))
        .route("/sightings", get(routes::sightings::get_sightings))
        .route("/charts", get(routes::sightings::get_charts))
        .route("/dataset/reload", post(routes::sightings::reload_dataset))
        .route("/videos", get(routes::videos::list_videos))
        // Visitor routes
        .route("/visit", post(routes::visitors::record_visit))
        .route("/visits", get(routes::visitors::list_visits));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::dashboard))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; no origins means same-origin only
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the HTTP server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.request_timeout_secs,
    )));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("UAP Watch listening on http://{}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("UAP Watch shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::{GeoCacheConfig, GeoLookup, GeoLookupError, GeoResolver, VisitorGeo};
    use crate::session::{SessionStore, SessionStoreConfig};
    use crate::sightings::{load_dataset, SightingRecord, SightingsDataset};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{Request, Response, StatusCode},
    };
    use std::net::{IpAddr, SocketAddr};
    use tower::util::ServiceExt;

    /// Geolocates every visitor to a fixed country, or always fails
    struct FixedLookup {
        country: Option<&'static str>,
    }

    #[async_trait]
    impl GeoLookup for FixedLookup {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn lookup(&self, ip: Option<IpAddr>) -> Result<VisitorGeo, GeoLookupError> {
            match self.country {
                Some(country) => Ok(VisitorGeo::new(
                    ip.map(|i| i.to_string()).unwrap_or_else(|| "198.51.100.1".to_string()),
                    country,
                    "Springfield",
                )),
                None => Err(GeoLookupError::Unavailable("connection refused".to_string())),
            }
        }
    }

    fn sample_dataset() -> SightingsDataset {
        SightingsDataset::new(vec![
            SightingRecord::new("2024-02", "USA", 37.09, -95.71, 98),
            SightingRecord::new("2024-01", "USA", 37.09, -95.71, 120),
            SightingRecord::new("2024-01", "Canada", 56.13, -106.35, 34),
            SightingRecord::new("2024-02", "Brazil", -14.24, -51.93, 17),
            SightingRecord::new("2024-01", "Chile", -35.67, -71.54, 61),
        ])
    }

    fn create_state(dataset: SightingsDataset, country: Option<&'static str>) -> AppState {
        create_state_with(dataset, country, &Config::default())
    }

    fn create_state_with(
        dataset: SightingsDataset,
        country: Option<&'static str>,
        config: &Config,
    ) -> AppState {
        let geo = Arc::new(GeoResolver::new(
            Arc::new(FixedLookup { country }),
            GeoCacheConfig::default(),
        ));
        let sessions = Arc::new(SessionStore::new(SessionStoreConfig::default()));
        AppState::new(dataset, geo, sessions, config)
    }

    fn visit_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/api/v1/visit");
        if let Some(forwarded_for) = forwarded_for {
            builder = builder.header("x-forwarded-for", forwarded_for);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    fn create_test_app(country: Option<&'static str>) -> Router {
        build_router(create_state(sample_dataset(), country))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app(Some("US")).oneshot(get_req("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_requires_data() {
        let app = build_router(create_state(SightingsDataset::default(), Some("US")));
        let response = app.oneshot(get_req("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = create_test_app(Some("US")).oneshot(get_req("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = create_test_app(Some("US")).oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dataset_records"], 5);
        assert_eq!(body["months"], 2);
        assert_eq!(body["geo_backend"], "fixed");
    }

    #[tokio::test]
    async fn test_list_months() {
        let response = create_test_app(Some("US")).oneshot(get_req("/api/v1/months")).await.unwrap();
        let body = json_body(response).await;

        assert_eq!(body["months"], serde_json::json!(["2024-01", "2024-02"]));
        assert_eq!(body["default"], "2024-01");
    }

    #[tokio::test]
    async fn test_sightings_default_month() {
        let response = create_test_app(Some("US")).oneshot(get_req("/api/v1/sightings")).await.unwrap();
        let body = json_body(response).await;

        assert_eq!(body["month"], "2024-01");
        assert_eq!(body["total_sightings"], 215);
        assert_eq!(body["records"].as_array().unwrap().len(), 3);
        assert_eq!(body["records"][0]["Country"], "USA");
    }

    #[tokio::test]
    async fn test_sightings_unknown_month_is_empty() {
        let response = create_test_app(Some("US"))
            .oneshot(get_req("/api/v1/sightings?month=1999-01"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["records"], serde_json::json!([]));
        assert_eq!(body["total_sightings"], 0);
    }

    #[tokio::test]
    async fn test_empty_month_rejected() {
        let response = create_test_app(Some("US"))
            .oneshot(get_req("/api/v1/sightings?month="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_charts_exclude_other_months() {
        let response = create_test_app(Some("US"))
            .oneshot(get_req("/api/v1/charts?month=2024-01"))
            .await
            .unwrap();
        let body = json_body(response).await;

        assert_eq!(
            body["map"]["data"][0]["hovertext"],
            serde_json::json!(["USA", "Canada", "Chile"])
        );

        let ranking: Vec<(String, u64)> = body["ranking"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| (t["name"].as_str().unwrap().to_string(), t["y"][0].as_u64().unwrap()))
            .collect();
        assert_eq!(
            ranking,
            vec![
                ("USA".to_string(), 120),
                ("Chile".to_string(), 61),
                ("Canada".to_string(), 34)
            ]
        );
    }

    #[tokio::test]
    async fn test_charts_for_empty_month_render() {
        let response = create_test_app(Some("US"))
            .oneshot(get_req("/api/v1/charts?month=2030-12"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["map"]["data"][0]["lat"], serde_json::json!([]));
        assert_eq!(body["ranking"]["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_visits_accumulate_in_session() {
        let app = create_test_app(Some("US"));

        let first = app.clone().oneshot(post_req("/api/v1/visit", None)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let cookie = set_cookie(&first).expect("session cookie");
        assert!(cookie.starts_with("uapwatch_session="));

        let body = json_body(first).await;
        assert_eq!(body["visitor"]["country"], "US");
        assert_eq!(body["session"]["rows"], serde_json::json!([{"country": "US", "visits": 1}]));

        let second = app
            .clone()
            .oneshot(post_req("/api/v1/visit", Some(&cookie)))
            .await
            .unwrap();

        // same session, expiry pushed forward
        assert_eq!(set_cookie(&second).as_deref(), Some(cookie.as_str()));
        let refreshed = second
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(refreshed.contains("Max-Age=1800"));
        let body = json_body(second).await;
        assert_eq!(body["session"]["rows"], serde_json::json!([{"country": "US", "visits": 2}]));
        assert_eq!(body["chart"]["data"][0]["y"], serde_json::json!([2]));

        // reading the table does not count a visit
        let table = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/visits")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(table).await;
        assert_eq!(body["total_visits"], 2);
    }

    #[tokio::test]
    async fn test_visit_uses_forwarded_address_when_trusted() {
        let mut config = Config::default();
        config.server.trust_proxy_headers = true;
        let app = build_router(create_state_with(sample_dataset(), Some("GB"), &config));

        let response = app
            .oneshot(visit_from("10.0.0.5:41000", Some("81.2.69.160")))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["visitor"]["ip"], "81.2.69.160");
    }

    #[tokio::test]
    async fn test_forwarded_headers_ignored_by_default() {
        let state = create_state(sample_dataset(), Some("GB"));
        let app = build_router(state.clone());

        for spoofed in ["81.2.69.160", "8.8.8.8", "1.1.1.1", "9.9.9.9"] {
            let response = app
                .clone()
                .oneshot(visit_from("203.0.113.9:52100", Some(spoofed)))
                .await
                .unwrap();
            let body = json_body(response).await;
            assert_eq!(body["visitor"]["ip"], "203.0.113.9");
        }

        // one client, one cached lookup
        assert_eq!(state.geo.len().await, 1);
    }

    #[tokio::test]
    async fn test_secure_cookie_flag() {
        let mut config = Config::default();
        config.session.cookie_secure = true;
        let app = build_router(create_state_with(sample_dataset(), Some("US"), &config));

        let response = app.oneshot(post_req("/api/v1/visit", None)).await.unwrap();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.ends_with("; Secure"));
    }

    #[tokio::test]
    async fn test_cors_only_for_configured_origins() {
        let cross_site = || {
            Request::builder()
                .uri("/api/v1/months")
                .header(header::ORIGIN, "https://elsewhere.example")
                .body(Body::empty())
                .unwrap()
        };

        let response = create_test_app(Some("US")).oneshot(cross_site()).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());

        let mut config = Config::default();
        config.server.cors_origins = vec!["https://elsewhere.example".to_string()];
        let app = build_router(create_state_with(sample_dataset(), Some("US"), &config));
        let response = app.oneshot(cross_site()).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://elsewhere.example"
        );
    }

    #[tokio::test]
    async fn test_dataset_reload_disabled_by_default() {
        let response = create_test_app(Some("US"))
            .oneshot(post_req("/api/v1/dataset/reload", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_failed_lookup_uses_placeholder() {
        let response = create_test_app(None)
            .oneshot(post_req("/api/v1/visit", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(
            body["visitor"],
            serde_json::json!({"ip": "Unavailable", "country": "Unknown", "city": "Unknown"})
        );
        assert!(body["lookup_error"].as_str().unwrap().contains("unavailable"));
        assert_eq!(
            body["session"]["rows"],
            serde_json::json!([{"country": "Unknown", "visits": 1}])
        );
    }

    #[tokio::test]
    async fn test_visits_without_session() {
        let response = create_test_app(Some("US")).oneshot(get_req("/api/v1/visits")).await.unwrap();
        let body = json_body(response).await;

        assert_eq!(body["total_visits"], 0);
        assert_eq!(body["rows"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_videos() {
        let response = create_test_app(Some("US")).oneshot(get_req("/api/v1/videos")).await.unwrap();
        let body = json_body(response).await;

        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["title"], "USA Pentagon UAP Video 1");
        assert_eq!(body[0]["embed_url"], "https://www.youtube.com/embed/VUrTsrhVce4");
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let response = create_test_app(Some("US")).oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"<option value="2024-01" selected>2024-01</option>"#));
        assert!(html.contains(r#"<option value="2024-02">2024-02</option>"#));
        assert!(html.contains("https://www.youtube.com/embed/LN22jK34usA"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = create_test_app(Some("US")).oneshot(get_req("/api/v1/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dataset_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sightings.csv");
        std::fs::write(
            &path,
            "Month,Country,Latitude,Longitude,Sightings\n2024-01,USA,37.09,-95.71,1\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.dataset.allow_reload = true;
        let app = build_router(create_state_with(load_dataset(&path).unwrap(), Some("US"), &config));

        std::fs::write(
            &path,
            "Month,Country,Latitude,Longitude,Sightings\n2024-03,Japan,36.2,138.25,4\n",
        )
        .unwrap();
        let response = app
            .clone()
            .oneshot(post_req("/api/v1/dataset/reload", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["months"], serde_json::json!(["2024-03"]));

        // a broken file keeps the previous dataset
        std::fs::write(&path, "Month,Country\n2024-04,France\n").unwrap();
        let response = app
            .clone()
            .oneshot(post_req("/api/v1/dataset/reload", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app.oneshot(get_req("/api/v1/months")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["months"], serde_json::json!(["2024-03"]));
    }
}
