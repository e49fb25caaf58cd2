use std::{
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use sonance_state::{Track, TrackId};
use tokio::sync::broadcast::error::TryRecvError;

use crate::{
    AppState, AppStateError, cms,
    library::CuratedView,
    playback_thread::{LogicToPlaybackMessage, PlaybackThread, PlaybackToLogicRx},
    session::{Generation, MediaEvent, MediaEventKind, MediaRequest, SessionSnapshot},
    tokio_thread::TokioThread,
};

/// Everything the presentation layer talks to: the catalog, the filtered
/// view, and the one playback session, plus the threads that feed them.
pub struct Logic {
    tokio_thread: TokioThread,
    playback_thread: PlaybackThread,
    playback_to_logic_rx: PlaybackToLogicRx,
    state: Arc<RwLock<AppState>>,
    client: Arc<cms::Client>,
}

pub struct LogicArgs {
    pub base_url: String,
    pub volume: f32,
    /// Signalled once the catalog fetch has completed successfully.
    pub library_populated_tx: std::sync::mpsc::Sender<()>,
}

impl Logic {
    pub fn new(
        LogicArgs {
            base_url,
            volume,
            library_populated_tx,
        }: LogicArgs,
    ) -> std::io::Result<Self> {
        let state = Arc::new(RwLock::new(AppState::default()));
        let client = Arc::new(cms::Client::new(base_url));
        let tokio_thread = TokioThread::new()?;
        let playback_thread = PlaybackThread::new(volume)?;
        let playback_to_logic_rx = playback_thread.subscribe();

        let logic = Logic {
            tokio_thread,
            playback_thread,
            playback_to_logic_rx,
            state,
            client,
        };
        logic.initial_fetch(library_populated_tx);
        Ok(logic)
    }

    /// Applies every media event that arrived since the last call.
    pub fn update(&mut self) {
        loop {
            match self.playback_to_logic_rx.try_recv() {
                Ok(event) => self.handle_media_event(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {skipped} playback events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    pub fn search(&self, query: &str) {
        tracing::debug!("Search query: {query:?}");
        self.write_state().library.search(query);
    }

    pub fn set_view(&self, view: CuratedView) {
        tracing::debug!("Switching to view {view}");
        self.write_state().library.set_view(view);
    }

    pub fn current_view(&self) -> CuratedView {
        self.read_state().library.view()
    }

    pub fn query(&self) -> String {
        self.read_state().library.query().to_string()
    }

    pub fn filtered_tracks(&self) -> Vec<Track> {
        self.read_state().library.filtered_tracks().cloned().collect()
    }

    pub fn has_loaded_catalog(&self) -> bool {
        self.read_state().library.has_loaded_catalog
    }

    pub fn catalog_len(&self) -> usize {
        self.read_state().library.catalog().len()
    }

    pub fn select_track(&self, track_id: TrackId) {
        let request = {
            let mut st = self.write_state();
            let Some(track) = st.library.track(track_id).cloned() else {
                tracing::warn!("Asked to select unknown track {track_id}");
                return;
            };
            st.session.select_track(track)
        };
        self.execute(request);
    }

    pub fn toggle_play_pause(&self) {
        let request = self.write_state().session.toggle_play_pause();
        if let Some(request) = request {
            self.execute(request);
        }
    }

    pub fn next(&self) {
        let request = {
            let mut st = self.write_state();
            let AppState {
                library, session, ..
            } = &mut *st;
            session.next(library)
        };
        if let Some(request) = request {
            self.execute(request);
        }
    }

    pub fn previous(&self) {
        let request = {
            let mut st = self.write_state();
            let AppState {
                library, session, ..
            } = &mut *st;
            session.previous(library)
        };
        if let Some(request) = request {
            self.execute(request);
        }
    }

    /// Seeks to `fraction` of the selected track; see
    /// [`crate::PlaybackSession::seek_fraction`].
    pub fn seek_fraction(&self, fraction: f64) {
        let request = self.write_state().session.seek_fraction(fraction);
        if let Some(request) = request {
            self.execute(request);
        }
    }

    /// Seeks `seconds` forwards (or backwards, if negative) from the current position.
    pub fn seek_relative(&self, seconds: i64) {
        let request = {
            let mut st = self.write_state();
            let current = st.session.position();
            let delta = Duration::from_secs(seconds.unsigned_abs());
            let target = if seconds >= 0 {
                current + delta
            } else {
                current.saturating_sub(delta)
            };
            st.session.seek_to(target)
        };
        if let Some(request) = request {
            self.execute(request);
        }
    }

    pub fn set_muted(&self, muted: bool) {
        let request = self.write_state().session.set_muted(muted);
        self.execute(request);
    }

    pub fn toggle_muted(&self) {
        let muted = self.read_state().session.is_muted();
        self.set_muted(!muted);
    }

    pub fn set_volume(&self, volume: f32) {
        self.playback_thread
            .send(LogicToPlaybackMessage::SetVolume(volume.clamp(0.0, 1.0)));
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.read_state().session.snapshot()
    }

    pub fn selected_track(&self) -> Option<Track> {
        self.read_state().session.selected_track().cloned()
    }

    pub fn cover_url(&self, track: &Track) -> String {
        self.client.cover_url(&track.cover_art_id.0)
    }

    pub fn get_error(&self) -> Option<AppStateError> {
        self.read_state().error.clone()
    }

    /// The current error, rendered for display.
    pub fn get_error_display(&self) -> Option<(&'static str, String)> {
        let st = self.read_state();
        let error = st.error.as_ref()?;
        Some((error.display_name(), error.display_message(&st)))
    }

    pub fn clear_error(&self) {
        self.write_state().error = None;
    }

    /// Stops audio and ends the playback thread. Also happens on drop.
    pub fn shutdown(&self) {
        self.playback_thread.shutdown();
    }
}
impl Logic {
    fn initial_fetch(&self, library_populated_tx: std::sync::mpsc::Sender<()>) {
        let client = self.client.clone();
        let state = self.state.clone();
        self.tokio_thread.spawn(async move {
            match sonance_state::fetch_catalog(&client).await {
                Ok(catalog) => {
                    state.write().unwrap().library.populate(catalog);
                    let _ = library_populated_tx.send(());
                }
                Err(e) => {
                    tracing::error!("Error fetching catalog: {e}");
                    state.write().unwrap().error =
                        Some(AppStateError::InitialFetchFailed {
                            error: e.to_string(),
                        });
                }
            }
        });
    }

    /// Hands a session request to the media backend.
    fn execute(&self, request: MediaRequest) {
        use LogicToPlaybackMessage as LTPM;

        match request {
            MediaRequest::Load {
                generation,
                track_id,
                url,
            } => {
                // Tear down the old binding before anything of the new one exists.
                self.playback_thread.send(LTPM::Unload(generation));
                self.load_track(generation, track_id, url);
            }
            MediaRequest::Pause { generation } => self.playback_thread.send(LTPM::Pause(generation)),
            MediaRequest::Resume { generation } => {
                self.playback_thread.send(LTPM::Resume(generation))
            }
            MediaRequest::Seek {
                generation,
                position,
            } => self.playback_thread.send(LTPM::Seek(generation, position)),
            MediaRequest::SetMuted(muted) => self.playback_thread.send(LTPM::SetMuted(muted)),
        }
    }

    fn load_track(&self, generation: Generation, track_id: TrackId, url: String) {
        let client = self.client.clone();
        let state = self.state.clone();
        let playback_tx = self.playback_thread.send_handle();

        tracing::debug!("Loading track {track_id} under {generation}");
        self.tokio_thread.spawn(async move {
            let response = client.download(&url).await;
            let message = finish_load(&mut state.write().unwrap(), generation, track_id, response);
            if let Some(message) = message {
                playback_tx.send(message);
            }
        });
    }

    fn handle_media_event(&self, event: MediaEvent) {
        let failure = match &event.kind {
            MediaEventKind::StartFailed(error) => Some(error.clone()),
            _ => None,
        };

        let mut st = self.write_state();
        if !st.session.handle_event(event) {
            return;
        }
        if let Some(error) = failure
            && let Some(track_id) = st.session.selected_track().map(|t| t.id)
        {
            st.error = Some(AppStateError::PlaybackFailed { track_id, error });
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap()
    }
}
/// Settles a download started under `generation`. Returns the message that
/// hands the media to the playback thread, or `None` if the download failed
/// or another track has been selected since.
fn finish_load(
    st: &mut AppState,
    generation: Generation,
    track_id: TrackId,
    response: cms::ClientResult<Vec<u8>>,
) -> Option<LogicToPlaybackMessage> {
    if st.session.generation() != generation {
        tracing::debug!("Load for track {track_id} under {generation} is stale");
        return None;
    }
    match response {
        Ok(data) => {
            tracing::debug!(
                "Loaded track {track_id} ({} bytes) under {generation}",
                data.len()
            );
            Some(LogicToPlaybackMessage::Load(generation, data))
        }
        Err(e) => {
            tracing::warn!("Load error for track {track_id} under {generation}: {e}");
            st.session.handle_event(MediaEvent {
                generation,
                kind: MediaEventKind::StartFailed(e.to_string()),
            });
            st.error = Some(AppStateError::LoadTrackFailed {
                track_id,
                error: e.to_string(),
            });
            None
        }
    }
}

impl Drop for Logic {
    fn drop(&mut self) {
        self.playback_thread.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PlaybackState,
        library::tests::{catalog, track},
    };

    fn not_found() -> cms::ClientResult<Vec<u8>> {
        Err(cms::ClientError::StatusError { code: 404 })
    }

    /// A state whose session selected track 1 and then track 2, returning
    /// the generations of both loads.
    fn superseded_state() -> (AppState, Generation, Generation) {
        let mut st = AppState::default();
        st.library.populate(catalog());
        st.session.select_track(track(1, "Colors", "William King", false));
        let first = st.session.generation();
        st.session.select_track(track(2, "Saudade", "Gonzalo Fuentes", true));
        let second = st.session.generation();
        (st, first, second)
    }

    #[test]
    fn test_current_download_is_handed_to_playback() {
        let (mut st, _, second) = superseded_state();
        let message = finish_load(&mut st, second, TrackId(2), Ok(vec![1, 2, 3]));
        assert!(matches!(
            message,
            Some(LogicToPlaybackMessage::Load(generation, data))
                if generation == second && data == [1, 2, 3]
        ));
        assert_eq!(st.error, None);
    }

    #[test]
    fn test_late_download_of_superseded_track_is_dropped() {
        let (mut st, first, _) = superseded_state();
        let message = finish_load(&mut st, first, TrackId(1), Ok(vec![1, 2, 3]));
        assert!(message.is_none());
        assert_eq!(st.session.state(), PlaybackState::Loading);
    }

    #[test]
    fn test_late_failure_of_superseded_track_is_not_surfaced() {
        let (mut st, first, _) = superseded_state();
        assert!(finish_load(&mut st, first, TrackId(1), not_found()).is_none());
        assert_eq!(st.error, None);
        assert_eq!(st.session.last_error(), None);
        assert_eq!(st.session.state(), PlaybackState::Loading);
    }

    #[test]
    fn test_current_failure_pauses_and_surfaces_error() {
        let (mut st, _, second) = superseded_state();
        assert!(finish_load(&mut st, second, TrackId(2), not_found()).is_none());
        assert_eq!(st.session.state(), PlaybackState::Paused);
        assert_eq!(
            st.session.last_error().map(|e| e.track_id),
            Some(TrackId(2))
        );
        assert_eq!(
            st.error,
            Some(AppStateError::LoadTrackFailed {
                track_id: TrackId(2),
                error: "Server returned status 404".to_string(),
            })
        );
    }
}
