mod app;
mod config;
mod keys;
mod log_buffer;
mod ui;

use std::time::{Duration, Instant};

use anyhow::Context as _;
use app::{App, FocusedPanel};
use config::Config;
use keys::Action;
use log_buffer::{LogBuffer, LogBufferLayer};
use sonance_core as sc;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> anyhow::Result<()> {
    // Logs go to the in-app panel instead of stdout.
    let log_buffer = LogBuffer::new();

    let log_file = std::fs::File::create("sonance.log").context("Failed to create sonance.log")?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(LogBufferLayer::new(log_buffer.clone()))
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sonance=info")),
        )
        .init();

    let config = Config::load()?;
    tracing::info!("Using content API at {}", config.server.base_url);

    let (library_populated_tx, library_populated_rx) = std::sync::mpsc::channel::<()>();

    let logic = sc::Logic::new(sc::LogicArgs {
        base_url: config.server.base_url.clone(),
        volume: config.general.volume,
        library_populated_tx,
    })
    .context("Failed to start background threads")?;

    let mut app = App::new(config, logic, library_populated_rx, log_buffer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(app.config.general.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.logic.shutdown();
    drop(app);

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if app.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, app))?;
            app.needs_redraw = false;
        }
        let term_size = terminal.size()?;
        let size = Rect::new(0, 0, term_size.width, term_size.height);

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            // Process the first event, then drain all remaining queued events.
            let process_event = |evt: Event, app: &mut App| match evt {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    handle_key_event(app, &key);
                    app.needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, &mouse, size);
                    app.needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    app.needs_redraw = true;
                }
                _ => {}
            };

            process_event(event::read()?, app);
            while event::poll(Duration::ZERO)? {
                process_event(event::read()?, app);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: &event::KeyEvent) {
    if app.quit_confirming {
        match keys::quit_confirm_action(key) {
            Action::Select => app.should_quit = true,
            _ => app.quit_confirming = false,
        }
        return;
    }

    match app.focused_panel {
        FocusedPanel::Tracks => {
            if let Some(action) = keys::tracks_action(key) {
                ui::tracks::handle_key(app, action);
            }
        }
        FocusedPanel::Search => {
            if let Some(action) = keys::search_action(key)
                && let Some(sa) = ui::search::handle_key(&mut app.search, &app.logic, action)
            {
                use ui::search::SearchAction;
                match sa {
                    SearchAction::Leave => app.toggle_search(),
                    SearchAction::Submit => {
                        app.toggle_search();
                        ui::tracks::handle_key(app, Action::Select);
                    }
                    SearchAction::Move(delta) => ui::tracks::handle_scroll(app, delta),
                    SearchAction::SwitchView => app.perform(Action::SwitchView),
                }
            }
        }
        FocusedPanel::Logs => {
            if let Some(action) = keys::logs_action(key)
                && let Some(la) = ui::logs::handle_key(&mut app.logs, action)
            {
                match la {
                    ui::logs::LogsAction::ToggleLogs => app.toggle_logs(),
                }
            }
        }
    }
}

fn handle_mouse_event(app: &mut App, mouse: &MouseEvent, size: Rect) {
    let main = ui::layout::split_main(size);
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.quit_confirming {
                return;
            }

            if ui::layout::contains(main.progress_bar, x, y) {
                ui::handle_progress_click(app, main.progress_bar, x, y);
            } else if let Some(view) = ui::layout::view_tab_at(main.tabs, x, y) {
                app.set_view(view);
            } else if ui::layout::contains(main.search, x, y) {
                app.focused_panel = FocusedPanel::Search;
            } else if ui::layout::contains(main.content, x, y) {
                if app.focused_panel == FocusedPanel::Search {
                    app.focused_panel = FocusedPanel::Tracks;
                }
                if app.focused_panel == FocusedPanel::Tracks {
                    ui::tracks::handle_mouse_click(app, main.content, y);
                }
            } else if ui::layout::contains(main.help_bar, x, y) {
                handle_help_bar_click(app, x);
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let steps = ui::layout::SCROLL_WHEEL_STEPS as isize;
            let delta = if mouse.kind == MouseEventKind::ScrollUp {
                -steps
            } else {
                steps
            };
            match app.focused_panel {
                FocusedPanel::Tracks | FocusedPanel::Search => {
                    ui::tracks::handle_scroll(app, delta)
                }
                FocusedPanel::Logs => app.logs.scroll(delta),
            }
        }
        _ => {}
    }
}

fn handle_help_bar_click(app: &mut App, x: u16) {
    let Some(&(_, _, action)) = app
        .help_bar_items
        .iter()
        .find(|(x_start, x_end, _)| x >= *x_start && x < *x_end)
    else {
        return;
    };

    match app.focused_panel {
        FocusedPanel::Tracks => ui::tracks::handle_key(app, action),
        FocusedPanel::Search | FocusedPanel::Logs => app.perform(action),
    }
}
