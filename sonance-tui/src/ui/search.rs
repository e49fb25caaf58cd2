use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use sonance_core::Logic;

use crate::keys::Action;

/// The search query as typed. Every edit is pushed to [`Logic::search`].
pub struct SearchState {
    pub query: String,
}

pub enum SearchAction {
    /// Stop typing and go back to the track list; the query stays applied.
    Leave,
    /// Play the highlighted track.
    Submit,
    Move(isize),
    SwitchView,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    /// Applies a text edit, returning whether the query changed.
    fn edit(&mut self, action: Action) -> bool {
        match action {
            Action::Char(c) => {
                self.query.push(c);
                true
            }
            Action::DeleteChar => self.query.pop().is_some(),
            Action::ClearLine => {
                let changed = !self.query.is_empty();
                self.query.clear();
                changed
            }
            _ => false,
        }
    }
}

pub fn draw(frame: &mut Frame, search: &SearchState, focused: bool, area: Rect) {
    let accent = if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let mut spans = vec![Span::styled(" / ", Style::default().fg(accent))];
    if search.query.is_empty() && !focused {
        spans.push(Span::styled(
            "Search Song, Artist",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            search.query.as_str(),
            Style::default().fg(Color::White),
        ));
    }
    if focused {
        spans.push(Span::styled("\u{2588}", Style::default().fg(accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn handle_key(search: &mut SearchState, logic: &Logic, action: Action) -> Option<SearchAction> {
    match action {
        Action::Back => Some(SearchAction::Leave),
        Action::Select => Some(SearchAction::Submit),
        Action::MoveUp => Some(SearchAction::Move(-1)),
        Action::MoveDown => Some(SearchAction::Move(1)),
        Action::SwitchView => Some(SearchAction::SwitchView),
        edit => {
            if search.edit(edit) {
                logic.search(&search.query);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_update_query() {
        let mut search = SearchState::new();
        assert!(search.edit(Action::Char('k')));
        assert!(search.edit(Action::Char('i')));
        assert_eq!(search.query, "ki");
        assert!(search.edit(Action::DeleteChar));
        assert_eq!(search.query, "k");
        assert!(search.edit(Action::ClearLine));
        assert_eq!(search.query, "");
    }

    #[test]
    fn test_no_op_edits_report_unchanged() {
        let mut search = SearchState::new();
        assert!(!search.edit(Action::DeleteChar));
        assert!(!search.edit(Action::ClearLine));
        assert!(!search.edit(Action::MoveUp));
    }
}
