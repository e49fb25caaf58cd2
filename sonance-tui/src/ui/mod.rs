pub(crate) mod layout;
pub(crate) mod logs;
pub(crate) mod now_playing;
pub(crate) mod search;
pub(crate) mod tracks;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph},
};
use smol_str::ToSmolStr as _;
use sonance_core::{SessionSnapshot, sonance_state::Accent, util::duration_to_hms_string};
use unicode_width::UnicodeWidthStr as _;

use crate::{
    app::{App, FocusedPanel},
    keys,
};

pub fn accent_to_color(accent: Accent) -> Color {
    Color::Rgb(accent.r, accent.g, accent.b)
}

/// Black or white, whichever reads better on top of `background`.
pub fn ambient_text_color(background: Accent) -> Color {
    // ITU-R BT.601 luma
    let luma = 0.299 * background.r as f32
        + 0.587 * background.g as f32
        + 0.114 * background.b as f32;
    if luma > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let snapshot = app.logic.session_snapshot();

    // The whole header follows the selected track's accent.
    let ambient = accent_to_color(snapshot.ambient_color);
    let main = layout::split_main(size);
    let header = Rect::new(
        size.x,
        size.y,
        size.width,
        main.now_playing.height + main.progress_bar.height,
    );
    frame.render_widget(Block::default().style(Style::default().bg(ambient)), header);

    now_playing::draw(frame, app, &snapshot, main.now_playing);
    draw_progress_bar(frame, &snapshot, main.progress_bar);
    draw_tabs(frame, app, main.tabs);
    search::draw(
        frame,
        &app.search,
        app.focused_panel == FocusedPanel::Search,
        main.search,
    );

    match app.focused_panel {
        FocusedPanel::Tracks | FocusedPanel::Search => tracks::draw(frame, app, main.content),
        FocusedPanel::Logs => logs::draw(frame, &mut app.logs, main.content),
    }

    draw_help_bar(frame, app, &snapshot, main.help_bar);

    if app.quit_confirming {
        let yes = keys::KEY_CONFIRM_YES.to_smolstr();
        let no = keys::KEY_CONFIRM_NO.to_smolstr();
        let prompt = format!("Quit? {yes}/{no}");
        let popup_width = prompt.width() as u16 + 4; // border (2) + padding (2)
        let popup_height = 3_u16;
        let x = size.x + (size.width.saturating_sub(popup_width)) / 2;
        let y = size.y + (size.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            popup_area,
        );
        let popup = Paragraph::new(format!(" {prompt}"))
            .block(Block::bordered().style(Style::default().fg(Color::White)))
            .style(Style::default().fg(Color::White));
        frame.render_widget(popup, popup_area);
    }
}

fn draw_progress_bar(frame: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let text = ambient_text_color(snapshot.ambient_color);
    let label = format!(
        " {} / {} ",
        duration_to_hms_string(snapshot.position),
        duration_to_hms_string(snapshot.duration)
    );

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(text)
                .bg(accent_to_color(snapshot.ambient_color)),
        )
        .ratio(snapshot.progress())
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.logic.current_view();
    let padding = " ".repeat(layout::TAB_PADDING as usize);

    let mut spans = Vec::new();
    for (i, (_, _, view)) in layout::view_tab_ranges(area).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                layout::TAB_SEPARATOR,
                Style::default().fg(Color::DarkGray),
            ));
        }
        let style = if view == current {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{padding}{view}{padding}"), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A click on the progress bar seeks proportionally.
pub fn handle_progress_click(app: &mut App, bar: Rect, x: u16, y: u16) {
    if let Some(fraction) = layout::seek_fraction_at(bar, x, y) {
        app.logic.seek_fraction(fraction);
    }
}

fn draw_help_bar(frame: &mut Frame, app: &mut App, snapshot: &SessionSnapshot, area: Rect) {
    let view = app.logic.current_view();
    let help_actions: &[keys::Action] = match app.focused_panel {
        FocusedPanel::Tracks => keys::TRACKS_HELP,
        FocusedPanel::Search => keys::SEARCH_HELP,
        FocusedPanel::Logs => keys::LOGS_HELP,
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    let mut x = area.x + 1;
    app.help_bar_items.clear();

    for action in help_actions {
        if let Some((key, label)) = action.help_label(snapshot, view) {
            let text = format!(":{label} ");
            let width = (key.width() + text.width()) as u16;
            app.help_bar_items.push((x, x + width, *action));
            x += width;

            spans.push(Span::styled(
                String::from(key),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::raw(text));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_text_contrasts_with_background() {
        assert_eq!(ambient_text_color(Accent::NEUTRAL), Color::White);
        assert_eq!(ambient_text_color(Accent::new(0xff, 0xff, 0xff)), Color::Black);
        assert_eq!(ambient_text_color(Accent::new(0x33, 0x1e, 0x00)), Color::White);
        assert_eq!(ambient_text_color(Accent::new(0xf0, 0xd0, 0x60)), Color::Black);
    }

    #[test]
    fn test_accent_maps_to_rgb() {
        assert_eq!(
            accent_to_color(Accent::new(0x12, 0x34, 0x56)),
            Color::Rgb(0x12, 0x34, 0x56)
        );
    }
}
