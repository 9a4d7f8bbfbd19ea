//! Video Routes
//!
//! - GET /api/v1/videos - Embedded video panels

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::VideoResponse;
use crate::api::state::AppState;
use crate::config::VideoConfig;

/// GET /api/v1/videos
pub async fn list_videos(State(state): State<Arc<AppState>>) -> Json<Vec<VideoResponse>> {
    Json(state.videos.iter().map(video_response).collect())
}

pub fn video_response(video: &VideoConfig) -> VideoResponse {
    VideoResponse {
        title: video.title.clone(),
        url: video.url.clone(),
        embed_url: embed_url(&video.url),
    }
}

/// iframe source for a video link
///
/// YouTube watch and short links become `/embed/{id}`; anything else is
/// used unchanged.
pub fn embed_url(url: &str) -> String {
    let id = url
        .split_once("youtube.com/watch?")
        .and_then(|(_, query)| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("v="))
        })
        .or_else(|| url.split_once("youtu.be/").map(|(_, rest)| rest))
        .map(|id| id.split(['?', '&', '#']).next().unwrap_or(id))
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => format!("https://www.youtube.com/embed/{}", id),
        None => url.to_string(),
    }
}
