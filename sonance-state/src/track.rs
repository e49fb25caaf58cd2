use serde::{Deserialize, Serialize};

use crate::{Accent, CoverArtId, cms};

/// A track ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);
impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A track, as `sonance` cares about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// The track ID
    pub id: TrackId,
    /// The track name
    pub name: String,
    /// The track artist
    pub artist: String,
    /// The URL of the playable media
    pub url: String,
    /// The cover art asset
    pub cover_art_id: CoverArtId,
    /// The ambient colour for this track
    pub accent: Accent,
    /// Whether the track belongs to the curated top tracks
    pub top_track: bool,
}
impl Track {
    /// Whether `name` or `artist` contains `lowercase_query`, which must
    /// already be lowercased.
    pub fn matches(&self, lowercase_query: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_query)
            || self.artist.to_lowercase().contains(lowercase_query)
    }
}
impl From<cms::Song> for Track {
    fn from(song: cms::Song) -> Self {
        let accent = Accent::parse(&song.accent).unwrap_or_else(|| {
            tracing::warn!(
                "Track {} has unrecognised accent {:?}, using {}",
                song.id,
                song.accent,
                Accent::NEUTRAL
            );
            Accent::NEUTRAL
        });
        Track {
            id: TrackId(song.id),
            name: song.name,
            artist: song.artist,
            url: song.url,
            cover_art_id: CoverArtId(song.cover.into()),
            accent,
            top_track: song.top_track,
        }
    }
}
