//! Track data model shared by the catalog, the player and the upload form.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Opaque track identifier, unique within the in-memory track list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier derived from a timestamp, used for freshly uploaded tracks.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// What kind of item a track is sold as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackKind {
    Beat,
    Track,
    Album,
}

impl TrackKind {
    /// Lowercase label, as shown under the now-playing title.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Beat => "beat",
            TrackKind::Track => "track",
            TrackKind::Album => "album",
        }
    }

    /// Next kind in `beat -> track -> album -> beat` order.
    pub fn cycle(self) -> Self {
        match self {
            TrackKind::Beat => TrackKind::Track,
            TrackKind::Track => TrackKind::Album,
            TrackKind::Album => TrackKind::Beat,
        }
    }
}

impl Default for TrackKind {
    fn default() -> Self {
        Self::Beat
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the bytes of a cover or an audio file live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaRef {
    /// Remote HTTP(S) location.
    Url(String),
    /// A file on disk: an imported library file or a session-local upload copy.
    File(PathBuf),
    /// Site-relative placeholder asset (e.g. the default cover); not playable.
    Asset(String),
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaRef::Url(u) => f.write_str(u),
            MediaRef::File(p) => write!(f, "{}", p.display()),
            MediaRef::Asset(a) => f.write_str(a),
        }
    }
}

/// One purchasable audio item.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub description: String,
    pub cover_image: MediaRef,
    pub audio_url: MediaRef,
    /// Non-negative price in dollars.
    pub price: f64,
    pub kind: TrackKind,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    // Display-only counters; nothing increments them.
    pub plays: u64,
    pub likes: u64,
}
