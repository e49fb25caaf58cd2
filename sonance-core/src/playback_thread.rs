use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use rodio::Source as _;

use crate::session::{Generation, MediaEvent, MediaEventKind};

pub struct PlaybackThread {
    logic_to_playback_tx: PlaybackThreadSendHandle,
    _playback_thread_handle: std::thread::JoinHandle<()>,
    playback_to_logic_rx: PlaybackToLogicRx,
    shutdown_sent: AtomicBool,
}
pub type PlaybackToLogicRx = tokio::sync::broadcast::Receiver<MediaEvent>;
#[derive(Clone)]
pub struct PlaybackThreadSendHandle(std::sync::mpsc::Sender<LogicToPlaybackMessage>);
impl PlaybackThreadSendHandle {
    pub fn send(&self, message: LogicToPlaybackMessage) {
        if self.0.send(message).is_err() {
            tracing::warn!("Playback thread has shut down; dropping message");
        }
    }
}
#[derive(Debug, Clone)]
pub enum LogicToPlaybackMessage {
    /// Stop whatever is playing and adopt `generation`; everything tagged with
    /// an older generation is ignored from here on.
    Unload(Generation),
    /// Decode `data` and start playing it, if `generation` is still current.
    Load(Generation, Vec<u8>),
    Pause(Generation),
    Resume(Generation),
    Seek(Generation, Duration),
    SetMuted(bool),
    SetVolume(f32),
    Shutdown,
}

impl PlaybackThread {
    pub fn new(volume: f32) -> std::io::Result<Self> {
        let (logic_to_playback_tx, logic_to_playback_rx) =
            std::sync::mpsc::channel::<LogicToPlaybackMessage>();
        let (playback_to_logic_tx, playback_to_logic_rx) =
            tokio::sync::broadcast::channel::<MediaEvent>(100);

        let playback_thread_handle = std::thread::Builder::new()
            .name("sonance-playback".to_string())
            .spawn(move || {
                Self::run(logic_to_playback_rx, playback_to_logic_tx, volume);
            })?;

        Ok(Self {
            logic_to_playback_tx: PlaybackThreadSendHandle(logic_to_playback_tx),
            _playback_thread_handle: playback_thread_handle,
            playback_to_logic_rx,
            shutdown_sent: AtomicBool::new(false),
        })
    }

    pub fn send(&self, message: LogicToPlaybackMessage) {
        self.logic_to_playback_tx.send(message);
    }

    /// Stops audio and ends the thread. Only the first call sends anything.
    pub fn shutdown(&self) {
        if !self.shutdown_sent.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutting down playback");
            self.send(LogicToPlaybackMessage::Shutdown);
        }
    }

    pub fn send_handle(&self) -> PlaybackThreadSendHandle {
        self.logic_to_playback_tx.clone()
    }

    pub fn subscribe(&self) -> PlaybackToLogicRx {
        self.playback_to_logic_rx.resubscribe()
    }

    fn run(
        playback_rx: std::sync::mpsc::Receiver<LogicToPlaybackMessage>,
        logic_tx: tokio::sync::broadcast::Sender<MediaEvent>,
        volume: f32,
    ) {
        use LogicToPlaybackMessage as LTPM;

        let send = |generation: Generation, kind: MediaEventKind| {
            let _ = logic_tx.send(MediaEvent { generation, kind });
        };

        let stream_handle = match rodio::OutputStreamBuilder::open_default_stream() {
            Ok(stream_handle) => stream_handle,
            Err(e) => {
                tracing::error!("Failed to open audio output: {e}");
                // Without a device, every load fails; keep answering until shutdown.
                while let Ok(msg) = playback_rx.recv() {
                    match msg {
                        LTPM::Load(generation, _) | LTPM::Resume(generation) => send(
                            generation,
                            MediaEventKind::StartFailed(format!("no audio output: {e}")),
                        ),
                        LTPM::Shutdown => return,
                        _ => {}
                    }
                }
                return;
            }
        };
        let sink = rodio::Sink::connect_new(stream_handle.mixer());

        fn build_decoder(
            data: Vec<u8>,
        ) -> Result<rodio::decoder::Decoder<std::io::Cursor<Vec<u8>>>, rodio::decoder::DecoderError>
        {
            rodio::decoder::DecoderBuilder::new()
                .with_byte_len(data.len() as u64)
                .with_data(std::io::Cursor::new(data))
                .build()
        }

        const POSITION_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

        let mut volume = volume;
        let mut muted = false;
        let apply_volume = |sink: &rodio::Sink, volume: f32, muted: bool| {
            sink.set_volume(if muted { 0.0 } else { volume });
        };
        apply_volume(&sink, volume, muted);

        let mut current_generation = Generation::default();
        let mut last_data: Option<Vec<u8>> = None;
        // Whether a source is appended and has not yet been reported as ended.
        let mut bound = false;
        let mut seek_debounce = SeekDebounce::default();
        let mut last_position_update = Instant::now();

        // Appends a fresh decoder for `data` and starts playing; reports the outcome.
        let start = |sink: &rodio::Sink, generation: Generation, data: Vec<u8>| -> bool {
            match build_decoder(data) {
                Ok(decoder) => {
                    if let Some(duration) = decoder.total_duration() {
                        send(generation, MediaEventKind::DurationKnown(duration));
                    }
                    sink.append(decoder);
                    sink.play();
                    send(generation, MediaEventKind::Started);
                    true
                }
                Err(e) => {
                    send(generation, MediaEventKind::StartFailed(e.to_string()));
                    false
                }
            }
        };

        let seek = |sink: &rodio::Sink, generation: Generation, position: Duration| {
            if let Err(e) = sink.try_seek(position) {
                tracing::warn!("Failed to seek to position {position:?}: {e}");
            }
            send(generation, MediaEventKind::PositionChanged(position));
        };

        loop {
            // Process all available messages without blocking
            while let Ok(msg) = playback_rx.try_recv() {
                match msg {
                    LTPM::Unload(generation) => {
                        sink.clear();
                        last_data = None;
                        bound = false;
                        seek_debounce.clear();
                        current_generation = generation;
                        tracing::debug!("Unloaded; now bound to {generation}");
                    }
                    LTPM::Load(generation, data) => {
                        if generation != current_generation {
                            tracing::debug!(
                                "Ignoring load for {generation} (current {current_generation})"
                            );
                            continue;
                        }
                        sink.clear();
                        seek_debounce.clear();
                        last_data = Some(data.clone());
                        bound = start(&sink, generation, data);
                    }
                    LTPM::Pause(generation) => {
                        if generation == current_generation {
                            sink.pause();
                        }
                    }
                    LTPM::Resume(generation) => {
                        if generation != current_generation {
                            continue;
                        }
                        if sink.empty() {
                            // Ended: start over from the beginning.
                            match last_data.clone() {
                                Some(data) => bound = start(&sink, generation, data),
                                None => send(
                                    generation,
                                    MediaEventKind::StartFailed("nothing loaded".to_string()),
                                ),
                            }
                        } else {
                            sink.play();
                            send(generation, MediaEventKind::Started);
                        }
                    }
                    LTPM::Seek(generation, position) => {
                        if generation != current_generation {
                            continue;
                        }
                        if let Some(position) = seek_debounce.request(Instant::now(), position) {
                            seek(&sink, generation, position);
                        }
                    }
                    LTPM::SetMuted(value) => {
                        muted = value;
                        apply_volume(&sink, volume, muted);
                    }
                    LTPM::SetVolume(value) => {
                        volume = value.clamp(0.0, 1.0);
                        apply_volume(&sink, volume, muted);
                    }
                    LTPM::Shutdown => {
                        sink.stop();
                        tracing::debug!("Playback thread shutting down");
                        return;
                    }
                }
            }

            if let Some(position) = seek_debounce.poll(Instant::now()) {
                seek(&sink, current_generation, position);
            }

            // The source drained by itself: the track ended.
            if bound && sink.empty() {
                bound = false;
                send(current_generation, MediaEventKind::Ended);
            }

            let now = Instant::now();
            if now.duration_since(last_position_update) >= POSITION_UPDATE_INTERVAL {
                last_position_update = now;
                if !sink.empty() && !sink.is_paused() {
                    send(
                        current_generation,
                        MediaEventKind::PositionChanged(sink.get_pos()),
                    );
                }
            }

            // Sleep for 10ms between iterations
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }
}

/// Rate-limits seeks on the sink. A seek inside the window is held back, and
/// the latest held seek is applied once the window has passed.
#[derive(Debug, Default)]
struct SeekDebounce {
    last_applied: Option<Instant>,
    pending: Option<Duration>,
}
impl SeekDebounce {
    const WINDOW: Duration = Duration::from_millis(250);

    /// Returns the position to seek to now, if any.
    fn request(&mut self, now: Instant, position: Duration) -> Option<Duration> {
        if self
            .last_applied
            .is_none_or(|last| now.duration_since(last) >= Self::WINDOW)
        {
            self.last_applied = Some(now);
            self.pending = None;
            Some(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Releases the held seek once the window has passed.
    fn poll(&mut self, now: Instant) -> Option<Duration> {
        let last = self.last_applied?;
        if now.duration_since(last) < Self::WINDOW {
            return None;
        }
        let position = self.pending.take()?;
        self.last_applied = Some(now);
        Some(position)
    }

    fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(secs: u64) -> Duration {
        Duration::from_secs(secs)
    }

    #[test]
    fn test_seek_outside_window_applies_immediately() {
        let start = Instant::now();
        let mut debounce = SeekDebounce::default();
        assert_eq!(debounce.request(start, secs(50)), Some(secs(50)));
        assert_eq!(
            debounce.request(start + SeekDebounce::WINDOW, secs(150)),
            Some(secs(150))
        );
        assert_eq!(debounce.poll(start + SeekDebounce::WINDOW * 4), None);
    }

    #[test]
    fn test_seek_inside_window_is_applied_once_window_passes() {
        let start = Instant::now();
        let mut debounce = SeekDebounce::default();
        assert_eq!(debounce.request(start, secs(50)), Some(secs(50)));

        // Two more clicks land inside the window; only the latest survives.
        let soon = start + Duration::from_millis(100);
        assert_eq!(debounce.request(soon, secs(100)), None);
        assert_eq!(debounce.request(soon, secs(150)), None);
        assert_eq!(debounce.poll(soon), None);

        let later = start + SeekDebounce::WINDOW;
        assert_eq!(debounce.poll(later), Some(secs(150)));
        assert_eq!(debounce.poll(later + SeekDebounce::WINDOW), None);
    }

    #[test]
    fn test_cleared_seek_is_not_applied() {
        let start = Instant::now();
        let mut debounce = SeekDebounce::default();
        debounce.request(start, secs(50));
        assert_eq!(debounce.request(start, secs(150)), None);
        debounce.clear();
        assert_eq!(debounce.poll(start + SeekDebounce::WINDOW), None);
    }

    #[test]
    fn test_shutdown_is_sent_once() {
        let (tx, rx) = std::sync::mpsc::channel();
        let (_events_tx, playback_to_logic_rx) = tokio::sync::broadcast::channel(1);
        let thread = PlaybackThread {
            logic_to_playback_tx: PlaybackThreadSendHandle(tx),
            _playback_thread_handle: std::thread::spawn(|| {}),
            playback_to_logic_rx,
            shutdown_sent: AtomicBool::new(false),
        };

        thread.shutdown();
        thread.shutdown();

        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], LogicToPlaybackMessage::Shutdown));
    }
}
