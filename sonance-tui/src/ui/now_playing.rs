use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use sonance_core::{PlaybackState, SessionSnapshot};

use crate::app::App;

use super::{ambient_text_color, layout};

pub fn draw(frame: &mut Frame, app: &App, snapshot: &SessionSnapshot, area: Rect) {
    let text = ambient_text_color(snapshot.ambient_color);

    let Some(track) = snapshot.selected_track.as_ref() else {
        draw_idle(frame, app, text, area);
        return;
    };

    let np = layout::split_now_playing(area);

    let cover_url = app.logic.cover_url(track);
    let info_lines = vec![
        Line::from(Span::styled(
            format!(" {}", track.name),
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", track.artist),
            Style::default().fg(text),
        )),
        Line::from(Span::styled(
            format!(" {cover_url}"),
            Style::default().fg(text).add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(info_lines), np.track_info);

    draw_status(frame, snapshot, text, np.status);
}

fn draw_idle(frame: &mut Frame, app: &App, text: Color, area: Rect) {
    let status = if app.logic.has_loaded_catalog() {
        format!("{} tracks", app.logic.catalog_len())
    } else {
        "Loading catalog...".to_string()
    };

    let lines = vec![
        Line::from(Span::styled(
            " sonance",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(text).add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_status(frame: &mut Frame, snapshot: &SessionSnapshot, text: Color, area: Rect) {
    let (icon, label) = match snapshot.state {
        PlaybackState::Idle => ("\u{23F9}", "stopped"),
        PlaybackState::Loading => ("\u{2026}", "loading"),
        PlaybackState::Playing => ("\u{25B6}", "playing"),
        PlaybackState::Paused => ("\u{23F8}", "paused"),
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{icon} {label} "),
        Style::default().fg(text).add_modifier(Modifier::BOLD),
    ))];
    if snapshot.is_muted {
        lines.push(Line::from(Span::styled(
            "muted ",
            Style::default().fg(text).add_modifier(Modifier::DIM),
        )));
    }
    if snapshot.last_error.is_some() {
        lines.push(Line::from(Span::styled(
            "playback failed ",
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Right), area);
}
