use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sonance_state::{Catalog, Track, TrackId};

/// The curated views the catalog can be browsed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CuratedView {
    /// Every track in the catalog.
    #[default]
    ForYou,
    /// Only tracks flagged as top tracks.
    TopTracks,
}
impl CuratedView {
    pub const ALL: [CuratedView; 2] = [CuratedView::ForYou, CuratedView::TopTracks];

    pub fn as_str(&self) -> &'static str {
        match self {
            CuratedView::ForYou => "For You",
            CuratedView::TopTracks => "Top Tracks",
        }
    }

    /// Text shown when nothing in this view survives the search.
    pub fn empty_message(&self) -> &'static str {
        match self {
            CuratedView::ForYou => "No songs found",
            CuratedView::TopTracks => "No top tracks found",
        }
    }

    pub fn admits(&self, track: &Track) -> bool {
        match self {
            CuratedView::ForYou => true,
            CuratedView::TopTracks => track.top_track,
        }
    }

    /// The other view; there are only two.
    pub fn toggled(&self) -> Self {
        match self {
            CuratedView::ForYou => CuratedView::TopTracks,
            CuratedView::TopTracks => CuratedView::ForYou,
        }
    }
}
impl std::fmt::Display for CuratedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the IDs of the tracks whose name or artist contains `query`,
/// ignoring case, in catalog order. An empty query matches everything.
pub fn filter(catalog: &Catalog, query: &str) -> Vec<TrackId> {
    if query.is_empty() {
        return catalog.tracks().iter().map(|t| t.id).collect();
    }

    let query = query.to_lowercase();
    catalog
        .tracks()
        .iter()
        .filter(|t| t.matches(&query))
        .map(|t| t.id)
        .collect()
}

/// The catalog, plus the subset of it that is currently visible.
#[derive(Default)]
pub struct Library {
    catalog: Catalog,
    track_index: HashMap<TrackId, usize>,
    filtered_ids: Vec<TrackId>,
    query: String,
    view: CuratedView,
    pub has_loaded_catalog: bool,
}
impl Library {
    pub fn populate(&mut self, catalog: Catalog) {
        self.track_index = catalog
            .tracks()
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.id, idx))
            .collect();
        self.catalog = catalog;
        self.refilter();
        self.has_loaded_catalog = true;
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn set_view(&mut self, view: CuratedView) {
        self.view = view;
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> CuratedView {
        self.view
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.track_index
            .get(&id)
            .and_then(|idx| self.catalog.tracks().get(*idx))
    }

    /// The filtered view, as IDs in catalog order.
    pub fn filtered_ids(&self) -> &[TrackId] {
        &self.filtered_ids
    }

    /// The filtered view, resolved to tracks.
    pub fn filtered_tracks(&self) -> impl Iterator<Item = &Track> {
        self.filtered_ids.iter().filter_map(|id| self.track(*id))
    }

    fn refilter(&mut self) {
        let matches = filter(&self.catalog, &self.query);
        self.filtered_ids = matches
            .into_iter()
            .filter(|id| self.track(*id).is_some_and(|t| self.view.admits(t)))
            .collect();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sonance_state::{Accent, CoverArtId};

    pub(crate) fn track(id: u64, name: &str, artist: &str, top_track: bool) -> Track {
        Track {
            id: TrackId(id),
            name: name.to_string(),
            artist: artist.to_string(),
            url: format!("https://example.com/{id}.mp3"),
            cover_art_id: CoverArtId(format!("cover-{id}").into()),
            accent: Accent::new(id as u8, 0x20, 0x30),
            top_track,
        }
    }

    pub(crate) fn catalog() -> Catalog {
        Catalog::new([
            track(1, "Colors", "William King", false),
            track(2, "Saudade", "Gonzalo Fuentes", true),
            track(3, "Midnight Drive", "Kings of Dusk", true),
            track(4, "Blue Hour", "Ana Ruiz", false),
        ])
    }

    fn ids(ids: &[u64]) -> Vec<TrackId> {
        ids.iter().copied().map(TrackId).collect()
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        assert_eq!(filter(&catalog(), ""), ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_filter_matches_name_or_artist_ignoring_case() {
        let catalog = catalog();
        assert_eq!(filter(&catalog, "KING"), ids(&[1, 3]));
        assert_eq!(filter(&catalog, "hour"), ids(&[4]));
        assert_eq!(filter(&catalog, "fuentes"), ids(&[2]));
    }

    #[test]
    fn test_filter_no_matches_is_empty() {
        assert!(filter(&catalog(), "zz").is_empty());
    }

    #[test]
    fn test_filter_is_ordered_unique_subsequence() {
        let catalog = catalog();
        let all = filter(&catalog, "");
        for query in ["", "a", "o", "in", "s", "x"] {
            let result = filter(&catalog, query);
            // Every result appears in the catalog, strictly after its predecessor.
            let mut last_pos = None;
            for id in &result {
                let pos = all.iter().position(|c| c == id).unwrap();
                assert!(last_pos.is_none_or(|last| pos > last), "{query:?}");
                last_pos = Some(pos);
            }
        }
    }

    #[test]
    fn test_library_views() {
        let mut library = Library::default();
        library.populate(Catalog::new([
            track(1, "T1", "A", false),
            track(2, "T2", "B", true),
        ]));
        assert!(library.has_loaded_catalog);
        assert_eq!(library.filtered_ids(), ids(&[1, 2]).as_slice());

        library.set_view(CuratedView::TopTracks);
        assert_eq!(library.filtered_ids(), ids(&[2]).as_slice());

        library.set_view(CuratedView::ForYou);
        assert_eq!(library.filtered_ids(), ids(&[1, 2]).as_slice());
    }

    #[test]
    fn test_library_search_combines_with_view() {
        let mut library = Library::default();
        library.populate(catalog());

        library.search("king");
        assert_eq!(library.filtered_ids(), ids(&[1, 3]).as_slice());

        library.set_view(CuratedView::TopTracks);
        assert_eq!(library.filtered_ids(), ids(&[3]).as_slice());
        assert_eq!(library.query(), "king");

        library.search("");
        assert_eq!(library.filtered_ids(), ids(&[2, 3]).as_slice());

        let names: Vec<_> = library.filtered_tracks().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Saudade", "Midnight Drive"]);
    }

    #[test]
    fn test_library_before_populate_is_empty() {
        let library = Library::default();
        assert!(!library.has_loaded_catalog);
        assert!(library.filtered_ids().is_empty());
        assert!(library.track(TrackId(1)).is_none());
    }

    #[test]
    fn test_curated_view_labels() {
        assert_eq!(CuratedView::default(), CuratedView::ForYou);
        assert_eq!(CuratedView::TopTracks.to_string(), "Top Tracks");
        assert_eq!(CuratedView::ForYou.toggled(), CuratedView::TopTracks);
        assert_eq!(CuratedView::TopTracks.empty_message(), "No top tracks found");
    }
}
