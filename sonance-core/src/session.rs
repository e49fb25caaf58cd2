//! The playback session: which track is selected, whether it is playing, and
//! where in it we are.
//!
//! The session never talks to an audio device itself. Operations return the
//! [`MediaRequest`] the media backend should carry out, and the backend reports
//! back through [`MediaEvent`]s. Every media binding gets a fresh [`Generation`];
//! events carrying any other generation are stale and are discarded.

use std::time::Duration;

use sonance_state::{Accent, Track, TrackId};

use crate::{
    library::Library,
    navigator::{Neighbor, compute_neighbor},
};

/// Identifies one binding of a track to the media backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);
impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}
impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No track selected.
    #[default]
    Idle,
    /// A track was chosen and playback was requested, but not yet confirmed.
    Loading,
    Playing,
    Paused,
}
impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Loading => "Loading",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }
}
impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Work for the media backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRequest {
    /// Drop whatever is bound, then load and start `url` under `generation`.
    Load {
        generation: Generation,
        track_id: TrackId,
        url: String,
    },
    Pause {
        generation: Generation,
    },
    Resume {
        generation: Generation,
    },
    Seek {
        generation: Generation,
        position: Duration,
    },
    SetMuted(bool),
}

/// A notification from the media backend about the binding `generation`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub generation: Generation,
    pub kind: MediaEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Playback (initial or resumed) was confirmed.
    Started,
    /// Playback could not be started or resumed.
    StartFailed(String),
    /// The playhead moved. Positions are clamped to the duration only once
    /// [`MediaEventKind::DurationKnown`] has arrived; before that they are kept as reported.
    PositionChanged(Duration),
    DurationKnown(Duration),
    Ended,
}

/// A playback failure, kept for display until the next track is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub track_id: TrackId,
    pub message: String,
}
impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "track {} failed to play: {}", self.track_id, self.message)
    }
}
impl std::error::Error for SessionError {}

/// A copy of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub selected_track: Option<Track>,
    pub state: PlaybackState,
    pub is_muted: bool,
    pub position: Duration,
    pub duration: Duration,
    pub ambient_color: Accent,
    pub last_error: Option<SessionError>,
}
impl SessionSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// How far through the track we are, in `[0, 1]`; 0 while the duration
    /// is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct PlaybackSession {
    selected: Option<Track>,
    state: PlaybackState,
    muted: bool,
    position: Duration,
    duration: Duration,
    ambient: Accent,
    generation: Generation,
    last_error: Option<SessionError>,
}
impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn ambient_color(&self) -> Accent {
        self.ambient
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected_track: self.selected.clone(),
            state: self.state,
            is_muted: self.muted,
            position: self.position,
            duration: self.duration,
            ambient_color: self.ambient,
            last_error: self.last_error.clone(),
        }
    }

    /// Binds `track` under a new generation, superseding whatever was bound
    /// before. Valid from any state.
    pub fn select_track(&mut self, track: Track) -> MediaRequest {
        self.generation = self.generation.next();
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.ambient = track.accent;
        self.state = PlaybackState::Loading;
        self.last_error = None;

        tracing::debug!(
            "Selected track {} ({}) under {}",
            track.id,
            track.name,
            self.generation
        );
        let request = MediaRequest::Load {
            generation: self.generation,
            track_id: track.id,
            url: track.url.clone(),
        };
        self.selected = Some(track);
        request
    }

    /// Pauses when playing and asks to resume when paused. Resuming only
    /// takes effect once the backend confirms it with [`MediaEventKind::Started`].
    /// Does nothing while idle or loading.
    pub fn toggle_play_pause(&mut self) -> Option<MediaRequest> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Some(MediaRequest::Pause {
                    generation: self.generation,
                })
            }
            PlaybackState::Paused => Some(MediaRequest::Resume {
                generation: self.generation,
            }),
            PlaybackState::Idle | PlaybackState::Loading => None,
        }
    }

    /// Moves to `target`, clamped to the duration. Does nothing unless a
    /// track is selected and its duration is known.
    pub fn seek_to(&mut self, target: Duration) -> Option<MediaRequest> {
        if self.selected.is_none() || self.duration.is_zero() {
            return None;
        }
        self.position = target.min(self.duration);
        Some(MediaRequest::Seek {
            generation: self.generation,
            position: self.position,
        })
    }

    /// Seeks to `fraction` of the duration, as produced by a click on a
    /// progress bar. Fractions outside `[0, 1]` are clamped.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<MediaRequest> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek_to(self.duration.mul_f64(fraction))
    }

    pub fn set_muted(&mut self, muted: bool) -> MediaRequest {
        self.muted = muted;
        MediaRequest::SetMuted(muted)
    }

    /// Selects the track after the current one in the library's filtered view.
    /// Does nothing if nothing is selected, the view is empty, or the selected
    /// track is no longer part of the view.
    pub fn next(&mut self, library: &Library) -> Option<MediaRequest> {
        self.skip(library, Neighbor::Next)
    }

    /// As [`Self::next`], but backwards.
    pub fn previous(&mut self, library: &Library) -> Option<MediaRequest> {
        self.skip(library, Neighbor::Prev)
    }

    fn skip(&mut self, library: &Library, dir: Neighbor) -> Option<MediaRequest> {
        let current = self.selected.as_ref()?.id;
        let Some(target) = compute_neighbor(library.filtered_ids(), current, dir) else {
            tracing::debug!("Track {current} is not in the current view; not skipping");
            return None;
        };
        let track = library.track(target)?.clone();
        Some(self.select_track(track))
    }

    /// Applies a backend notification. Returns `false` if the event belongs
    /// to a superseded binding and was discarded.
    pub fn handle_event(&mut self, event: MediaEvent) -> bool {
        if event.generation != self.generation || self.selected.is_none() {
            tracing::debug!(
                "Discarding stale media event {:?} from {} (current {})",
                event.kind,
                event.generation,
                self.generation
            );
            return false;
        }

        match event.kind {
            MediaEventKind::Started => {
                if matches!(self.state, PlaybackState::Loading | PlaybackState::Paused) {
                    self.state = PlaybackState::Playing;
                }
            }
            MediaEventKind::StartFailed(message) => {
                self.state = PlaybackState::Paused;
                if let Some(track) = &self.selected {
                    tracing::error!("Error playing track {}: {message}", track.id);
                    self.last_error = Some(SessionError {
                        track_id: track.id,
                        message,
                    });
                }
            }
            MediaEventKind::PositionChanged(position) => {
                self.position = if self.duration.is_zero() {
                    position
                } else {
                    position.min(self.duration)
                };
            }
            MediaEventKind::DurationKnown(duration) => {
                self.duration = duration;
                self.position = self.position.min(duration);
            }
            MediaEventKind::Ended => {
                self.state = PlaybackState::Paused;
                if !self.duration.is_zero() {
                    self.position = self.duration;
                }
            }
        }
        true
    }
}
