//! Playlist resolution endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use moodplay_common::Selection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ApiError, AppState};

/// POST /get_playlist request body
///
/// Fields are kept as raw JSON so that any well-formed body resolves;
/// see [`Selection::from_json`] for how non-string values are treated.
#[derive(Debug, Default, Deserialize)]
pub struct PlaylistRequest {
    #[serde(default)]
    pub emotion: Option<Value>,
    #[serde(default)]
    pub genre: Option<Value>,
}

/// POST /get_playlist response body
#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub playlist: Vec<String>,
}

/// POST /get_playlist
///
/// Resolves the detected emotion and selected genre to playlist identifiers.
/// Unknown labels are not an error; the response carries an empty list when
/// nothing in the table matches.
pub async fn get_playlist(
    State(state): State<AppState>,
    payload: Result<Json<PlaylistRequest>, JsonRejection>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let Json(request) = payload?;
    let selection = Selection::from_json(request.emotion, request.genre);

    let playlist = state.playlists.resolve(&selection).to_vec();

    Ok(Json(PlaylistResponse { playlist }))
}
