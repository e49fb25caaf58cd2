use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, keys::Action};

use super::{accent_to_color, layout};

pub struct TracksState {
    pub selected_index: usize,
    list_state: ListState,
}

impl TracksState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            list_state: ListState::default(),
        }
    }

    pub fn select_index(&mut self, index: usize) {
        self.selected_index = index;
    }

    /// Moves the selection by `delta` rows, staying within `len` rows.
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = self
            .selected_index
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    /// The row index under terminal row `y`, given the list was drawn in `inner`.
    fn index_at(&self, inner: Rect, y: u16) -> Option<usize> {
        if y < inner.y || y >= inner.y + inner.height {
            return None;
        }
        Some(self.list_state.offset() + (y - inner.y) as usize)
    }
}

fn block(app: &App) -> Block<'static> {
    let view = app.logic.current_view();
    Block::default()
        .title(format!(" {view} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
}

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = block(app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.logic.has_loaded_catalog() {
        let message = match app.logic.get_error_display() {
            Some((name, message)) => Line::from(Span::styled(
                format!("{name}: {message}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                "Loading catalog...",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(message), inner);
        return;
    }

    let tracks = app.logic.filtered_tracks();
    if tracks.is_empty() {
        let empty = Paragraph::new(app.logic.current_view().empty_message())
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let snapshot = app.logic.session_snapshot();
    let playing_id = snapshot.selected_track.as_ref().map(|t| t.id);

    app.tracks.selected_index = app.tracks.selected_index.min(tracks.len() - 1);

    let items: Vec<ListItem> = tracks
        .iter()
        .map(|track| {
            let is_current = Some(track.id) == playing_id;
            let marker = match (is_current, snapshot.is_playing()) {
                (true, true) => "\u{25B6} ",
                (true, false) => "\u{23F8} ",
                _ => "  ",
            };
            let name_style = if is_current {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled("\u{25A0} ", Style::default().fg(accent_to_color(track.accent))),
                Span::styled(track.name.clone(), name_style),
                Span::styled(" - ", Style::default().fg(Color::DarkGray)),
                Span::styled(track.artist.clone(), Style::default().fg(Color::DarkGray)),
            ];
            if track.top_track {
                spans.push(Span::styled(" \u{2605}", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::Rgb(50, 50, 80)));
    app.tracks.list_state.select(Some(app.tracks.selected_index));
    frame.render_stateful_widget(list, inner, &mut app.tracks.list_state);
}

pub fn handle_key(app: &mut App, action: Action) {
    let len = app.logic.filtered_tracks().len();
    match action {
        Action::MoveUp => app.tracks.move_selection(-1, len),
        Action::MoveDown => app.tracks.move_selection(1, len),
        Action::PageUp => app
            .tracks
            .move_selection(-(layout::PAGE_SCROLL_SIZE as isize), len),
        Action::PageDown => app
            .tracks
            .move_selection(layout::PAGE_SCROLL_SIZE as isize, len),
        Action::GotoTop => app.tracks.select_index(0),
        Action::GotoBottom => app.tracks.select_index(len.saturating_sub(1)),
        Action::Select => app.play_index(app.tracks.selected_index),
        other => app.perform(other),
    }
}

/// A click on a row plays it.
pub fn handle_mouse_click(app: &mut App, area: Rect, y: u16) {
    let inner = block(app).inner(area);
    if let Some(index) = app.tracks.index_at(inner, y) {
        app.play_index(index);
    }
}

pub fn handle_scroll(app: &mut App, delta: isize) {
    let len = app.logic.filtered_tracks().len();
    app.tracks.move_selection(delta, len);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_selection_stays_in_bounds() {
        let mut state = TracksState::new();
        state.move_selection(-1, 5);
        assert_eq!(state.selected_index, 0);
        state.move_selection(3, 5);
        assert_eq!(state.selected_index, 3);
        state.move_selection(20, 5);
        assert_eq!(state.selected_index, 4);
        state.move_selection(1, 0);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_index_at_accounts_for_offset() {
        let state = TracksState::new();
        let inner = Rect::new(1, 7, 40, 10);
        assert_eq!(state.index_at(inner, 7), Some(0));
        assert_eq!(state.index_at(inner, 9), Some(2));
        assert_eq!(state.index_at(inner, 6), None);
        assert_eq!(state.index_at(inner, 17), None);
    }
}
