use serde::{Deserialize, Serialize};
use sonance_state::TrackId;

use crate::{library::Library, session::PlaybackSession};

#[derive(Default)]
pub struct AppState {
    pub library: Library,
    pub session: PlaybackSession,

    pub error: Option<AppStateError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppStateError {
    InitialFetchFailed { error: String },
    LoadTrackFailed { track_id: TrackId, error: String },
    PlaybackFailed { track_id: TrackId, error: String },
}
impl AppStateError {
    /// Should be paired with [`Self::display_message`]
    pub fn display_name(&self) -> &'static str {
        match self {
            AppStateError::InitialFetchFailed { .. } => "Failed to fetch the catalog",
            AppStateError::LoadTrackFailed { .. } => "Failed to load track",
            AppStateError::PlaybackFailed { .. } => "Failed to play track",
        }
    }

    /// Should be paired with [`Self::display_name`]
    pub fn display_message(&self, state: &AppState) -> String {
        let describe = |track_id: &TrackId| {
            state
                .library
                .track(*track_id)
                .map(|t| format!("{} - {}", t.artist, t.name))
                .unwrap_or_else(|| format!("#{track_id}"))
        };
        match self {
            AppStateError::InitialFetchFailed { error } => error.clone(),
            AppStateError::LoadTrackFailed { track_id, error } => {
                format!("Track `{}` failed to load: {error}", describe(track_id))
            }
            AppStateError::PlaybackFailed { track_id, error } => {
                format!("Track `{}` failed to play: {error}", describe(track_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tests::catalog;

    #[test]
    fn test_display_message_names_the_track() {
        let mut state = AppState::default();
        state.library.populate(catalog());

        let error = AppStateError::PlaybackFailed {
            track_id: TrackId(2),
            error: "unsupported format".to_string(),
        };
        assert_eq!(error.display_name(), "Failed to play track");
        assert_eq!(
            error.display_message(&state),
            "Track `Gonzalo Fuentes - Saudade` failed to play: unsupported format"
        );

        let unknown = AppStateError::LoadTrackFailed {
            track_id: TrackId(99),
            error: "404".to_string(),
        };
        assert_eq!(
            unknown.display_message(&state),
            "Track `#99` failed to load: 404"
        );
    }
}
