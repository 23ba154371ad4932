//! Service status endpoints
//!
//! `/health` reports whether the playlist table can serve the fallback path,
//! plus the build identification captured by `build.rs`.

use axum::{extract::State, routing::get, Json, Router};
use moodplay_common::DEFAULT_EMOTION;
use serde::Serialize;

use crate::AppState;

/// Build identification baked in at compile time
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("GIT_HASH").to_string(),
            build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
            build_profile: env!("BUILD_PROFILE").to_string(),
        }
    }
}

/// Playlist table summary
#[derive(Debug, Serialize)]
pub struct TableStatus {
    pub keys: usize,
    pub has_neutral: bool,
}

/// GET /health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the table has no `neutral` entry and
    /// unknown emotions resolve to an empty playlist
    pub status: &'static str,
    pub module: &'static str,
    pub playlists: TableStatus,
    pub build: BuildInfo,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let has_neutral = state.playlists.contains_key(DEFAULT_EMOTION);
    Json(HealthResponse {
        status: if has_neutral { "ok" } else { "degraded" },
        module: "moodplay-server",
        playlists: TableStatus {
            keys: state.playlists.len(),
            has_neutral,
        },
        build: BuildInfo::current(),
    })
}

/// GET /api/buildinfo
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}

/// Status routes (no state beyond the table)
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/buildinfo", get(get_build_info))
}
