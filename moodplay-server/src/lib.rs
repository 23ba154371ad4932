//! moodplay-server library
//!
//! HTTP front end that maps a detected emotion and optional genre to a
//! playlist using a table loaded once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use moodplay_common::config::DEFAULT_STATIC_DIR;
use moodplay_common::PlaylistTable;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod error;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Playlist table (read-only after startup)
    pub playlists: Arc<PlaylistTable>,
    /// Folder served under `/static`, ahead of the embedded assets
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state with the default assets folder
    pub fn new(playlists: PlaylistTable) -> Self {
        Self {
            playlists: Arc::new(playlists),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::handler::HandlerWithoutStateExt;
    use axum::routing::{get, post};

    let static_files =
        ServeDir::new(&state.static_dir).fallback(api::serve_embedded.into_service());

    Router::new()
        .route("/", get(api::serve_index))
        .route("/get_playlist", post(api::get_playlist))
        .merge(api::status_routes())
        .nest_service("/static", static_files)
        .fallback(api::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Any origin may call the playlist endpoint
        .layer(CorsLayer::permissive())
}
