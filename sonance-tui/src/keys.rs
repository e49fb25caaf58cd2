use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use smol_str::{SmolStr, ToSmolStr};
use sonance_core::{CuratedView, SessionSnapshot};

/// Centrally defined key actions for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PlayPause,
    Next,
    Previous,
    Mute,
    SwitchView,
    Search,
    Logs,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    GotoPlaying,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Select,
    Back,
    ClearLine,
    Char(char),
    DeleteChar,
}

// ── Key code constants ───────────────────────────────────────────

pub const KEY_QUIT: KeyCode = KeyCode::Char('q');
pub const KEY_PLAY_PAUSE: KeyCode = KeyCode::Char(' ');
pub const KEY_NEXT: KeyCode = KeyCode::Char('n');
pub const KEY_PREVIOUS: KeyCode = KeyCode::Char('p');
pub const KEY_MUTE: KeyCode = KeyCode::Char('m');
pub const KEY_SWITCH_VIEW: KeyCode = KeyCode::Tab;
pub const KEY_SEARCH: KeyCode = KeyCode::Char('/');
pub const KEY_LOGS: KeyCode = KeyCode::Char('L');
pub const KEY_GOTO_PLAYING: KeyCode = KeyCode::Char('g');
pub const KEY_SEEK_BACK: KeyCode = KeyCode::Char('<');
pub const KEY_SEEK_BACK_ALT: KeyCode = KeyCode::Char(',');
pub const KEY_SEEK_FWD: KeyCode = KeyCode::Char('>');
pub const KEY_SEEK_FWD_ALT: KeyCode = KeyCode::Char('.');
pub const KEY_VOLUME_UP: KeyCode = KeyCode::Char('+');
pub const KEY_VOLUME_UP_ALT: KeyCode = KeyCode::Char('=');
pub const KEY_VOLUME_DOWN: KeyCode = KeyCode::Char('-');
pub const KEY_SELECT: KeyCode = KeyCode::Enter;
pub const KEY_BACK: KeyCode = KeyCode::Esc;
pub const KEY_UP: KeyCode = KeyCode::Up;
pub const KEY_DOWN: KeyCode = KeyCode::Down;
pub const KEY_PAGE_UP: KeyCode = KeyCode::PageUp;
pub const KEY_PAGE_DOWN: KeyCode = KeyCode::PageDown;
pub const KEY_GOTO_TOP: KeyCode = KeyCode::Home;
pub const KEY_GOTO_BOTTOM: KeyCode = KeyCode::End;
pub const KEY_DELETE_CHAR: KeyCode = KeyCode::Backspace;
pub const KEY_CONFIRM_YES: KeyCode = KeyCode::Char('y');
pub const KEY_CONFIRM_NO: KeyCode = KeyCode::Char('n');

impl Action {
    /// Label shown in the help bar. Returns `None` for actions that
    /// shouldn't appear (navigation, text input, etc.).
    pub fn help_label(
        &self,
        snapshot: &SessionSnapshot,
        view: CuratedView,
    ) -> Option<(SmolStr, SmolStr)> {
        let (key, desc): (KeyCode, SmolStr) = match self {
            Action::Quit => (KEY_QUIT, "quit".into()),
            Action::PlayPause => {
                let label = if snapshot.is_playing() {
                    "pause"
                } else {
                    "play"
                };
                (KEY_PLAY_PAUSE, label.into())
            }
            Action::Next => (KEY_NEXT, "next".into()),
            Action::Previous => (KEY_PREVIOUS, "prev".into()),
            Action::Mute => {
                let label = if snapshot.is_muted { "unmute" } else { "mute" };
                (KEY_MUTE, label.into())
            }
            Action::SwitchView => {
                (KEY_SWITCH_VIEW, view.toggled().as_str().to_lowercase().into())
            }
            Action::Search => (KEY_SEARCH, "search".into()),
            Action::Logs => (KEY_LOGS, "logs".into()),
            Action::SeekForward => (KEY_SEEK_FWD, "seek+".into()),
            Action::SeekBackward => (KEY_SEEK_BACK, "seek-".into()),
            Action::VolumeUp => (KEY_VOLUME_UP, "vol+".into()),
            Action::VolumeDown => (KEY_VOLUME_DOWN, "vol-".into()),
            Action::GotoPlaying => (KEY_GOTO_PLAYING, "goto".into()),
            Action::Select => (KEY_SELECT, "play".into()),
            Action::Back => (KEY_BACK, "close".into()),
            _ => return None,
        };
        let key_str: SmolStr = key.to_smolstr().to_lowercase().into();
        Some((key_str, desc))
    }
}

/// Resolve a key event into an action in track list context.
pub fn tracks_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_QUIT => Some(Action::Quit),
        KEY_PLAY_PAUSE => Some(Action::PlayPause),
        KEY_NEXT => Some(Action::Next),
        KEY_PREVIOUS => Some(Action::Previous),
        KEY_MUTE => Some(Action::Mute),
        KEY_SWITCH_VIEW => Some(Action::SwitchView),
        KEY_SEARCH => Some(Action::Search),
        KEY_LOGS => Some(Action::Logs),
        KEY_GOTO_PLAYING => Some(Action::GotoPlaying),
        KEY_SEEK_BACK | KEY_SEEK_BACK_ALT => Some(Action::SeekBackward),
        KEY_SEEK_FWD | KEY_SEEK_FWD_ALT => Some(Action::SeekForward),
        KEY_VOLUME_UP | KEY_VOLUME_UP_ALT => Some(Action::VolumeUp),
        KEY_VOLUME_DOWN => Some(Action::VolumeDown),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        KEY_SELECT => Some(Action::Select),
        _ => None,
    }
}

/// Resolve a key event into an action in search context.
pub fn search_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK => Some(Action::Back),
        KEY_SELECT => Some(Action::Select),
        KEY_SWITCH_VIEW => Some(Action::SwitchView),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_DELETE_CHAR => Some(Action::DeleteChar),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                Some(Action::ClearLine)
            } else {
                Some(Action::Char(c))
            }
        }
        _ => None,
    }
}

/// Resolve a key event into an action in logs context.
pub fn logs_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_LOGS | KEY_QUIT => Some(Action::Back),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

/// Resolve a key event into an action in quit-confirmation context.
/// `y` / Enter confirms; any other key cancels.
pub fn quit_confirm_action(key: &KeyEvent) -> Action {
    match key.code {
        KEY_CONFIRM_YES | KEY_SELECT => Action::Select,
        _ => Action::Back,
    }
}

/// Ordered list of actions to show in the track list help bar.
pub const TRACKS_HELP: &[Action] = &[
    Action::Quit,
    Action::PlayPause,
    Action::Next,
    Action::Previous,
    Action::Mute,
    Action::SeekBackward,
    Action::SeekForward,
    Action::SwitchView,
    Action::Search,
    Action::GotoPlaying,
    Action::Logs,
    Action::Select,
];

/// Ordered list of actions to show in the search help bar.
pub const SEARCH_HELP: &[Action] = &[Action::Back, Action::Select, Action::SwitchView];

/// Ordered list of actions to show in the logs help bar.
pub const LOGS_HELP: &[Action] = &[Action::Back];

#[cfg(test)]
mod tests {
    use super::*;
    use sonance_core::PlaybackSession;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tracks_transport_keys() {
        assert_eq!(tracks_action(&key(KeyCode::Char(' '))), Some(Action::PlayPause));
        assert_eq!(tracks_action(&key(KeyCode::Char('n'))), Some(Action::Next));
        assert_eq!(tracks_action(&key(KeyCode::Char('p'))), Some(Action::Previous));
        assert_eq!(tracks_action(&key(KeyCode::Char('m'))), Some(Action::Mute));
        assert_eq!(tracks_action(&key(KeyCode::Tab)), Some(Action::SwitchView));
        assert_eq!(
            tracks_action(&key(KeyCode::Char(','))),
            Some(Action::SeekBackward)
        );
        assert_eq!(tracks_action(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_search_treats_letters_as_text() {
        assert_eq!(search_action(&key(KeyCode::Char('n'))), Some(Action::Char('n')));
        assert_eq!(search_action(&key(KeyCode::Char('q'))), Some(Action::Char('q')));
        assert_eq!(
            search_action(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::ClearLine)
        );
        assert_eq!(search_action(&key(KeyCode::Esc)), Some(Action::Back));
    }

    #[test]
    fn test_quit_confirmation() {
        assert_eq!(quit_confirm_action(&key(KeyCode::Char('y'))), Action::Select);
        assert_eq!(quit_confirm_action(&key(KeyCode::Enter)), Action::Select);
        assert_eq!(quit_confirm_action(&key(KeyCode::Char('n'))), Action::Back);
    }

    #[test]
    fn test_help_labels_follow_state() {
        let snapshot = PlaybackSession::new().snapshot();
        let (_, label) = Action::PlayPause
            .help_label(&snapshot, CuratedView::ForYou)
            .unwrap();
        assert_eq!(label, "play");

        let (_, label) = Action::SwitchView
            .help_label(&snapshot, CuratedView::ForYou)
            .unwrap();
        assert_eq!(label, "top tracks");

        assert!(Action::MoveUp.help_label(&snapshot, CuratedView::ForYou).is_none());
    }
}
