//! Representations of sonance's catalog, as well as a way to retrieve it from the content API.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

use std::collections::HashSet;

pub use sonance_cms as cms;

mod accent;
pub use accent::Accent;

mod cover_art;
pub use cover_art::CoverArtId;

mod track;
pub use track::{Track, TrackId};

/// The full, ordered set of tracks obtained from the content API.
///
/// Order is the order the server returned them in. There are no mutation
/// operations; a new catalog is built instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}
impl Catalog {
    /// Builds a catalog, keeping the first occurrence of any duplicated ID.
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut seen = HashSet::new();
        let tracks = tracks
            .into_iter()
            .filter(|track| {
                let fresh = seen.insert(track.id);
                if !fresh {
                    tracing::warn!("Dropping duplicate track {}", track.id);
                }
                fresh
            })
            .collect();
        Self { tracks }
    }

    /// All tracks, in source order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a track by ID.
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// The number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog has no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
impl From<Vec<cms::Song>> for Catalog {
    fn from(songs: Vec<cms::Song>) -> Self {
        Catalog::new(songs.into_iter().map(Track::from))
    }
}

/// Fetches the whole catalog from the content API.
pub async fn fetch_catalog(client: &cms::Client) -> cms::ClientResult<Catalog> {
    let songs = client.fetch_songs().await?;
    tracing::info!("Fetched {} songs", songs.len());
    Ok(Catalog::from(songs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: u64, name: &str, accent: &str) -> cms::Song {
        cms::Song {
            id,
            name: name.to_string(),
            artist: "Artist".to_string(),
            url: format!("https://example.com/{id}.mp3"),
            cover: format!("cover-{id}"),
            accent: accent.to_string(),
            top_track: id % 2 == 0,
            status: None,
            sort: None,
            user_created: None,
            date_created: None,
            user_updated: None,
            date_updated: None,
        }
    }

    #[test]
    fn test_catalog_keeps_source_order() {
        let catalog = Catalog::from(vec![song(3, "c", "#111"), song(1, "a", "#222")]);
        let ids: Vec<_> = catalog.tracks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TrackId(3), TrackId(1)]);
    }

    #[test]
    fn test_catalog_drops_duplicate_ids() {
        let catalog = Catalog::from(vec![
            song(1, "first", "#111"),
            song(2, "b", "#222"),
            song(1, "second", "#333"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(TrackId(1)).unwrap().name, "first");
    }

    #[test]
    fn test_track_from_song() {
        let track = Track::from(song(2, "Colors", "#331E00"));
        assert_eq!(track.id, TrackId(2));
        assert_eq!(track.accent, Accent::new(0x33, 0x1e, 0x00));
        assert_eq!(track.cover_art_id, CoverArtId("cover-2".into()));
        assert!(track.top_track);
    }

    #[test]
    fn test_track_with_bad_accent_is_neutral() {
        let track = Track::from(song(1, "a", "not a colour"));
        assert_eq!(track.accent, Accent::NEUTRAL);
    }

    #[test]
    fn test_track_matches_is_case_insensitive() {
        let track = Track::from(song(1, "Midnight City", "#000"));
        assert!(track.matches("night"));
        assert!(track.matches("artist"));
        assert!(!track.matches("zz"));
    }
}
