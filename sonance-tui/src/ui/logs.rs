use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{keys::Action, log_buffer::LogBuffer};

pub struct LogsState {
    pub log_buffer: LogBuffer,
    pub scroll_offset: usize,
}

pub enum LogsAction {
    ToggleLogs,
}

impl LogsState {
    pub fn new(log_buffer: LogBuffer) -> Self {
        Self {
            log_buffer,
            scroll_offset: 0,
        }
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_offset = self.log_buffer.len().saturating_sub(1);
    }

    pub fn scroll(&mut self, delta: isize) {
        let log_len = self.log_buffer.len();
        if log_len == 0 {
            return;
        }
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(delta)
            .min(log_len - 1);
    }
}

pub fn draw(frame: &mut Frame, logs: &mut LogsState, area: Rect) {
    let entries = logs.log_buffer.get_entries();

    let block = Block::default()
        .title(format!(" Logs ({}) ", entries.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if entries.is_empty() {
        let empty = Paragraph::new("No log entries").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let (level_str, level_color) = match entry.level {
                tracing::Level::ERROR => ("ERR", Color::Red),
                tracing::Level::WARN => ("WRN", Color::Yellow),
                tracing::Level::INFO => ("INF", Color::Cyan),
                tracing::Level::DEBUG => ("DBG", Color::Green),
                tracing::Level::TRACE => ("TRC", Color::DarkGray),
            };

            // Keep the tail of long targets.
            let target = if entry.target.len() > super::layout::LOG_TARGET_WIDTH {
                let tail_start = entry
                    .target
                    .len()
                    .saturating_sub(super::layout::LOG_TARGET_SUFFIX_LEN);
                let tail_start = (tail_start..entry.target.len())
                    .find(|i| entry.target.is_char_boundary(*i))
                    .unwrap_or(entry.target.len());
                format!("...{}", &entry.target[tail_start..])
            } else {
                entry.target.clone()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    level_str,
                    Style::default()
                        .fg(level_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{target:width$}", width = super::layout::LOG_TARGET_WIDTH),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(entry.message.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::Rgb(50, 50, 80))
            .add_modifier(Modifier::BOLD),
    );

    logs.scroll_offset = logs.scroll_offset.min(entries.len() - 1);
    let mut state = ListState::default();
    state.select(Some(logs.scroll_offset));

    frame.render_stateful_widget(list, inner, &mut state);
}

pub fn handle_key(logs: &mut LogsState, action: Action) -> Option<LogsAction> {
    let page = super::layout::PAGE_SCROLL_SIZE as isize;
    match action {
        Action::Back => return Some(LogsAction::ToggleLogs),
        Action::MoveUp => logs.scroll(-1),
        Action::MoveDown => logs.scroll(1),
        Action::PageUp => logs.scroll(-page),
        Action::PageDown => logs.scroll(page),
        Action::GotoTop => logs.scroll_offset = 0,
        Action::GotoBottom => logs.scroll_to_end(),
        _ => {}
    }
    None
}
