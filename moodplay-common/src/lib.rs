//! # moodplay Common Library
//!
//! Shared code for the moodplay service:
//! - Playlist table loading and emotion/genre resolution
//! - Configuration resolution (CLI, environment, TOML, compiled defaults)
//! - Common error type

pub mod config;
pub mod error;
pub mod playlist;

pub use error::{Error, Result};
pub use playlist::{composite_key, resolve, Label, MatchRule, PlaylistTable, Selection, DEFAULT_EMOTION};
