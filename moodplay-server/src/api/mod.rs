//! HTTP API handlers for moodplay-server

pub mod playlist;
pub mod status;
pub mod ui;

pub use playlist::get_playlist;
pub use status::status_routes;
pub use ui::{not_found, serve_embedded, serve_index};
