//! Playlist table and emotion/genre resolution
//!
//! The table maps lookup keys to ordered playlist identifiers. A key is one of:
//! - a plain emotion (`"happy"`)
//! - a plain genre (`"rock"`)
//! - a composite `"<emotion>_<genre>"` (`"happy_rock"`)
//!
//! The table is loaded once at startup and never mutated afterwards, so it can
//! be shared across request handlers behind an `Arc` without locking.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;

/// Emotion used when a request does not name one, and the last-resort lookup key
pub const DEFAULT_EMOTION: &str = "neutral";

/// Immutable mapping from lookup key to playlist identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlaylistTable {
    entries: HashMap<String, Vec<String>>,
}

/// Which lookup produced a resolution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// `"<emotion>_<genre>"` entry
    Composite,
    /// Genre-only entry
    Genre,
    /// Emotion-only entry
    Emotion,
    /// `"neutral"` fallback (no genre supplied)
    Neutral,
    /// Nothing matched; result is empty
    Unmatched,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Composite => "composite",
            MatchRule::Genre => "genre",
            MatchRule::Emotion => "emotion",
            MatchRule::Neutral => "neutral",
            MatchRule::Unmatched => "unmatched",
        }
    }
}

/// A label taken from a request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// String label, looked up by exact key
    Key(String),
    /// Non-string value; never matches a table key
    Opaque,
}

impl Label {
    /// Lookup key, if this label can match one
    pub fn key(&self) -> Option<&str> {
        match self {
            Label::Key(key) => Some(key.as_str()),
            Label::Opaque => None,
        }
    }
}

/// Normalised (emotion, genre) pair taken from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub emotion: Label,
    pub genre: Option<Label>,
}

impl Selection {
    /// Build a selection from string request fields.
    ///
    /// A missing emotion becomes [`DEFAULT_EMOTION`]. An empty genre string is
    /// treated the same as no genre.
    pub fn new(emotion: Option<String>, genre: Option<String>) -> Self {
        Self {
            emotion: Label::Key(emotion.unwrap_or_else(|| DEFAULT_EMOTION.to_string())),
            genre: genre.filter(|g| !g.is_empty()).map(Label::Key),
        }
    }

    /// Build a selection from arbitrary JSON request fields.
    ///
    /// Emotion: absent or `null` becomes [`DEFAULT_EMOTION`]; any other
    /// non-string is [`Label::Opaque`].
    /// Genre: absent, `null`, and falsy values (`false`, `0`, `""`, `[]`, `{}`)
    /// mean no genre; any other non-string is [`Label::Opaque`].
    pub fn from_json(emotion: Option<Value>, genre: Option<Value>) -> Self {
        let emotion = match emotion {
            None | Some(Value::Null) => Label::Key(DEFAULT_EMOTION.to_string()),
            Some(Value::String(s)) => Label::Key(s),
            Some(_) => Label::Opaque,
        };
        let genre = genre.filter(is_truthy).map(|value| match value {
            Value::String(s) => Label::Key(s),
            _ => Label::Opaque,
        });
        Self { emotion, genre }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Build the composite lookup key for an emotion and genre
pub fn composite_key(emotion: &str, genre: &str) -> String {
    format!("{}_{}", emotion, genre)
}

impl PlaylistTable {
    /// Parse a JSON object of `key -> [playlist id, ...]`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: PlaylistTable = serde_json::from_str(json)?;
        Ok(table)
    }

    /// Load the table from a JSON file
    ///
    /// A missing or unreadable file is an error; callers treat it as fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents)?;

        info!(
            "Loaded {} playlist keys from {}",
            table.len(),
            path.display()
        );
        if !table.contains_key(DEFAULT_EMOTION) {
            warn!(
                "Playlist table has no '{}' entry; unknown emotions will resolve to an empty playlist",
                DEFAULT_EMOTION
            );
        }

        Ok(table)
    }

    /// Build a table from in-memory entries
    pub fn from_entries<K, I, V>(entries: I) -> Self
    where
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Resolve a selection to its playlist, borrowing from the table
    pub fn resolve(&self, selection: &Selection) -> &[String] {
        let (rule, playlist) = self.lookup(
            selection.emotion.key(),
            selection.genre.as_ref().map(Label::key),
        );
        debug!(
            emotion = ?selection.emotion,
            genre = ?selection.genre,
            rule = rule.as_str(),
            "Resolved playlist with {} entries",
            playlist.len()
        );
        playlist
    }

    /// Resolve an emotion and optional genre, reporting which lookup matched.
    ///
    /// With a genre: composite key, then genre, then emotion, else empty.
    /// Without a genre: emotion, then `"neutral"`, else empty.
    /// An empty genre string counts as no genre.
    pub fn resolve_with_rule(&self, emotion: &str, genre: Option<&str>) -> (MatchRule, &[String]) {
        self.lookup(Some(emotion), genre.filter(|g| !g.is_empty()).map(Some))
    }

    // Outer `None` genre: no genre supplied. `Some(None)`: a genre that
    // cannot match any key. `None` emotion likewise matches nothing.
    fn lookup(&self, emotion: Option<&str>, genre: Option<Option<&str>>) -> (MatchRule, &[String]) {
        let by_emotion = emotion.and_then(|e| self.get(e));
        match genre {
            Some(genre) => {
                if let (Some(emotion), Some(genre)) = (emotion, genre) {
                    if let Some(playlist) = self.get(&composite_key(emotion, genre)) {
                        return (MatchRule::Composite, playlist);
                    }
                }
                if let Some(playlist) = genre.and_then(|g| self.get(g)) {
                    return (MatchRule::Genre, playlist);
                }
                if let Some(playlist) = by_emotion {
                    return (MatchRule::Emotion, playlist);
                }
            }
            None => {
                if let Some(playlist) = by_emotion {
                    return (MatchRule::Emotion, playlist);
                }
                if let Some(playlist) = self.get(DEFAULT_EMOTION) {
                    return (MatchRule::Neutral, playlist);
                }
            }
        }
        (MatchRule::Unmatched, &[][..])
    }
}

/// Resolve an emotion and optional genre against `table`
///
/// Always returns a list, empty when nothing matches.
pub fn resolve(emotion: &str, genre: Option<&str>, table: &PlaylistTable) -> Vec<String> {
    table.resolve_with_rule(emotion, genre).1.to_vec()
}
