use sonance_core::{self as sc, sonance_state::TrackId};

use crate::{
    config::Config,
    keys::Action,
    log_buffer::LogBuffer,
    ui::{layout, logs::LogsState, search::SearchState, tracks::TracksState},
};

/// Which panel/mode the UI is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Tracks,
    Search,
    Logs,
}

pub struct App {
    // Core infrastructure (shared across views)
    pub logic: sc::Logic,
    pub config: Config,
    pub library_populated_rx: std::sync::mpsc::Receiver<()>,

    // Global UI orchestration
    pub focused_panel: FocusedPanel,
    pub quit_confirming: bool,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub volume: f32,
    /// Help bar hit ranges `[start, end)` from the last draw.
    pub help_bar_items: Vec<(u16, u16, Action)>,
    last_selected_track: Option<TrackId>,

    // Per-view state (owned by their respective modules)
    pub tracks: TracksState,
    pub search: SearchState,
    pub logs: LogsState,
}

impl App {
    pub fn new(
        config: Config,
        logic: sc::Logic,
        library_populated_rx: std::sync::mpsc::Receiver<()>,
        log_buffer: LogBuffer,
    ) -> Self {
        Self {
            logic,
            volume: config.general.volume,
            config,
            library_populated_rx,

            focused_panel: FocusedPanel::Tracks,
            quit_confirming: false,
            should_quit: false,
            needs_redraw: true,
            help_bar_items: Vec::new(),
            last_selected_track: None,

            tracks: TracksState::new(),
            search: SearchState::new(),
            logs: LogsState::new(log_buffer),
        }
    }

    pub fn tick(&mut self) {
        self.logic.update();

        while let Ok(()) = self.library_populated_rx.try_recv() {
            tracing::info!("Catalog loaded: {} tracks", self.logic.catalog_len());
            self.tracks.select_index(0);
        }

        // Follow the session when next/previous moves it.
        let selected = self.logic.selected_track().map(|t| t.id);
        if selected != self.last_selected_track {
            self.last_selected_track = selected;
            if let Some(track_id) = selected {
                self.goto_track(track_id);
            }
        }

        self.needs_redraw = true;
    }

    /// Handles the actions that mean the same thing in every panel.
    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit_confirming = true,
            Action::PlayPause => self.logic.toggle_play_pause(),
            Action::Next => self.logic.next(),
            Action::Previous => self.logic.previous(),
            Action::Mute => self.logic.toggle_muted(),
            Action::SeekForward => self.logic.seek_relative(layout::SEEK_STEP_SECS),
            Action::SeekBackward => self.logic.seek_relative(-layout::SEEK_STEP_SECS),
            Action::VolumeUp => self.adjust_volume(layout::VOLUME_STEP),
            Action::VolumeDown => self.adjust_volume(-layout::VOLUME_STEP),
            Action::SwitchView => self.set_view(self.logic.current_view().toggled()),
            Action::Search => self.toggle_search(),
            Action::Logs => self.toggle_logs(),
            Action::GotoPlaying => {
                if let Some(track_id) = self.last_selected_track {
                    self.goto_track(track_id);
                }
            }
            Action::Back => self.focused_panel = FocusedPanel::Tracks,
            _ => {}
        }
    }

    pub fn set_view(&mut self, view: sc::CuratedView) {
        self.logic.set_view(view);
        self.tracks.select_index(0);
        if let Some(track_id) = self.last_selected_track {
            self.goto_track(track_id);
        }
    }

    /// Starts playing the track at `index` in the visible list.
    pub fn play_index(&mut self, index: usize) {
        let Some(track) = self.logic.filtered_tracks().into_iter().nth(index) else {
            return;
        };
        self.tracks.select_index(index);
        self.logic.clear_error();
        self.logic.select_track(track.id);
    }

    pub fn toggle_search(&mut self) {
        if self.focused_panel == FocusedPanel::Search {
            self.focused_panel = FocusedPanel::Tracks;
        } else {
            self.focused_panel = FocusedPanel::Search;
        }
    }

    pub fn toggle_logs(&mut self) {
        if self.focused_panel == FocusedPanel::Logs {
            self.focused_panel = FocusedPanel::Tracks;
        } else {
            self.focused_panel = FocusedPanel::Logs;
            self.logs.scroll_to_end();
        }
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        self.logic.set_volume(self.volume);
    }

    /// Moves the list selection onto `track_id`, if it is visible.
    fn goto_track(&mut self, track_id: TrackId) {
        if let Some(index) = self
            .logic
            .filtered_tracks()
            .iter()
            .position(|t| t.id == track_id)
        {
            self.tracks.select_index(index);
        }
    }
}
