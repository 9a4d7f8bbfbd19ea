//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod page;
pub mod sightings;
pub mod videos;
pub mod visitors;

use crate::api::error::ApiError;
use axum::http::Uri;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
