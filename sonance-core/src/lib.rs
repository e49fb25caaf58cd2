pub mod library;
pub mod navigator;
pub mod session;
pub mod util;

mod app_state;
pub use app_state::{AppState, AppStateError};

mod logic;
pub use logic::{Logic, LogicArgs};

mod playback_thread;

mod tokio_thread;

pub use library::{CuratedView, Library};
pub use session::{
    Generation, MediaEvent, MediaEventKind, MediaRequest, PlaybackSession, PlaybackState,
    SessionError, SessionSnapshot,
};
pub use sonance_cms as cms;
pub use sonance_state;
