//! UI serving routes
//!
//! The landing page and its script are embedded in the binary. Everything
//! under `/static` is served from the configured assets folder first, so a
//! deployment can add files (detector models, images) or replace the script.

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::ApiError;

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const SCRIPT_JS: &str = include_str!("../../ui/script.js");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Embedded assets, used when the assets folder has no matching file
///
/// The `/static` prefix is already stripped from `uri`.
pub async fn serve_embedded(uri: Uri) -> Response {
    match uri.path() {
        "/script.js" => (
            StatusCode::OK,
            [("content-type", "application/javascript")],
            SCRIPT_JS,
        )
            .into_response(),
        path => ApiError::NotFound(format!("/static{}", path)).into_response(),
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
